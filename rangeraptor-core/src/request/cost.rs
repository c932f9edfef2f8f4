use serde::{Deserialize, Serialize};

use crate::model::transit::Time;

/// Relaxes the generalized cost comparison at the destination: a path is
/// kept if its c1 is below `ratio * other + slack`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelaxCost {
    pub ratio: f64,
    /// Seconds
    pub slack: Time,
}

/// Generalized cost parameters, durations in seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostParameters {
    pub board_cost: Time,
    pub transfer_cost: Time,
    pub wait_reluctance: f64,
    pub walk_reluctance: f64,
    /// Indexed by the route reluctance index, missing entries count as 1.0
    pub transit_reluctance: Vec<f64>,
    pub relax_c1_at_destination: Option<RelaxCost>,
}

impl Default for CostParameters {
    fn default() -> Self {
        Self {
            board_cost: 120,
            transfer_cost: 0,
            wait_reluctance: 1.0,
            walk_reluctance: 2.0,
            transit_reluctance: vec![1.0],
            relax_c1_at_destination: None,
        }
    }
}
