use serde::{Deserialize, Serialize};

use crate::model::transit::Time;

/// Minimum buffers around boarding and alighting, in seconds.
///
/// Per-route overrides are looked up by the route slack index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlackParameters {
    pub board_slack: Time,
    pub alight_slack: Time,
    pub transfer_slack: Time,
    pub board_slack_by_index: Vec<Time>,
    pub alight_slack_by_index: Vec<Time>,
}

impl Default for SlackParameters {
    fn default() -> Self {
        Self {
            board_slack: 0,
            alight_slack: 0,
            transfer_slack: 120,
            board_slack_by_index: Vec::new(),
            alight_slack_by_index: Vec::new(),
        }
    }
}

impl SlackParameters {
    pub fn board_slack(&self, slack_index: usize) -> Time {
        self.board_slack_by_index
            .get(slack_index)
            .copied()
            .unwrap_or(self.board_slack)
    }

    pub fn alight_slack(&self, slack_index: usize) -> Time {
        self.alight_slack_by_index
            .get(slack_index)
            .copied()
            .unwrap_or(self.alight_slack)
    }
}
