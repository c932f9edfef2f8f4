//! Generalized cost (c1) in centi-seconds

use crate::model::transit::{Cost, Time, Transfer};
use crate::request::CostParameters;

/// Converts a reluctance or a duration in seconds to cost units
fn factor(reluctance: f64) -> Cost {
    (reluctance * 100.0).round() as Cost
}

#[derive(Debug, Clone)]
pub struct CostCalculator {
    board_cost: Cost,
    transfer_cost: Cost,
    wait_factor: Cost,
    walk_factor: Cost,
    transit_factors: Vec<Cost>,
    /// +1 forward, -1 reverse: riding cost grows with search time
    sign: Cost,
}

impl CostCalculator {
    pub fn new(params: &CostParameters, forward: bool) -> Self {
        Self {
            board_cost: params.board_cost * 100,
            transfer_cost: params.transfer_cost * 100,
            wait_factor: factor(params.wait_reluctance),
            walk_factor: factor(params.walk_reluctance),
            transit_factors: params.transit_reluctance.iter().copied().map(factor).collect(),
            sign: if forward { 1 } else { -1 },
        }
    }

    pub fn transit_factor(&self, reluctance_index: usize) -> Cost {
        self.transit_factors
            .get(reluctance_index)
            .copied()
            .unwrap_or(100)
    }

    pub fn wait_cost(&self, wait: Time) -> Cost {
        self.wait_factor * wait
    }

    /// Cost after boarding a trip.
    ///
    /// Waiting before the first boarding is free, the departure time of the
    /// journey is shifted to remove it.
    pub fn board_c1(
        &self,
        prev_c1: Cost,
        first_boarding: bool,
        wait: Time,
        stop_cost: Cost,
    ) -> Cost {
        let transfer = if first_boarding {
            0
        } else {
            self.transfer_cost + self.wait_cost(wait)
        };
        prev_c1 + self.board_cost + transfer + stop_cost
    }

    /// Guaranteed transfers pay for boarding and waiting but not for the transfer
    pub fn guaranteed_board_c1(&self, prev_c1: Cost, wait: Time, stop_cost: Cost) -> Cost {
        prev_c1 + self.board_cost + self.wait_cost(wait) + stop_cost
    }

    /// Board cost with the riding cost up to `board_time` taken out. Adding the
    /// riding cost up to any alight time gives the cost of riding between them.
    pub fn relative_c1(&self, board_c1: Cost, board_time: Time, reluctance_index: usize) -> Cost {
        board_c1 - self.sign * self.transit_factor(reluctance_index) * board_time
    }

    pub fn transit_arrival_c1(
        &self,
        relative_c1: Cost,
        alight_time: Time,
        reluctance_index: usize,
        alight_slack: Time,
        stop_cost: Cost,
    ) -> Cost {
        relative_c1
            + self.sign * self.transit_factor(reluctance_index) * alight_time
            + self.wait_cost(alight_slack)
            + stop_cost
    }

    pub fn transfer_c1(&self, transfer: &Transfer) -> Cost {
        transfer
            .c1
            .unwrap_or_else(|| self.walk_factor * transfer.duration)
    }
}
