use crate::model::transit::Time;
use crate::request::SlackParameters;

/// Slack seen from the search direction. In a reverse search the rider
/// "boards" at the real alighting end, so board and alight slack swap.
#[derive(Debug, Clone, Copy)]
pub struct SearchSlack<'a> {
    params: &'a SlackParameters,
    forward: bool,
}

impl<'a> SearchSlack<'a> {
    pub fn new(params: &'a SlackParameters, forward: bool) -> Self {
        Self { params, forward }
    }

    pub fn board_slack(&self, slack_index: usize) -> Time {
        if self.forward {
            self.params.board_slack(slack_index)
        } else {
            self.params.alight_slack(slack_index)
        }
    }

    pub fn alight_slack(&self, slack_index: usize) -> Time {
        if self.forward {
            self.params.alight_slack(slack_index)
        } else {
            self.params.board_slack(slack_index)
        }
    }

    pub fn transfer_slack(&self) -> Time {
        self.params.transfer_slack
    }

    /// Slack between the previous arrival and boarding in `round`. The
    /// first boarding follows the access leg and needs no transfer slack.
    pub fn board_slack_in_round(&self, slack_index: usize, round: usize) -> Time {
        let transfer = if round > 1 { self.transfer_slack() } else { 0 };
        self.board_slack(slack_index) + transfer
    }

    /// Slack parameters in real time, used when mapping paths
    pub fn real(&self) -> &'a SlackParameters {
        self.params
    }
}
