//! Multi-criteria arrival labels and their dominance

use super::group_priority;
use super::pareto_set::ParetoComparator;
use super::pass_through::PassThroughPointsService;
use crate::model::transit::{Cost, Time};
use crate::routing::raptor::common::{ArrivalId, StopArrival};

/// How c2 takes part in dominance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum C2Dominance {
    #[default]
    None,
    /// More pass-through points visited is better
    PassThrough,
    /// Different priority group sets are incomparable
    GroupPriority,
}

impl C2Dominance {
    pub fn left_dominance(self, left: u32, right: u32) -> bool {
        match self {
            C2Dominance::None => false,
            C2Dominance::PassThrough => PassThroughPointsService::dominates(left, right),
            C2Dominance::GroupPriority => group_priority::dominates(left, right),
        }
    }

    pub fn is_active(self) -> bool {
        self != C2Dominance::None
    }
}

/// Criteria of an arrival as stored in a stop frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct McLabel {
    pub id: ArrivalId,
    pub time: Time,
    pub round: usize,
    pub c1: Cost,
    pub c2: u32,
    pub on_board: bool,
}

impl McLabel {
    pub fn new(id: ArrivalId, arrival: &StopArrival) -> Self {
        Self {
            id,
            time: arrival.time,
            round: arrival.round,
            c1: arrival.c1,
            c2: arrival.c2,
            on_board: arrival.arrived_on_board(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ArrivalComparator {
    forward: bool,
    c2: C2Dominance,
}

impl ArrivalComparator {
    pub fn new(forward: bool, c2: C2Dominance) -> Self {
        Self { forward, c2 }
    }
}

impl ParetoComparator<McLabel> for ArrivalComparator {
    fn left_dominance_exists(&self, left: &McLabel, right: &McLabel) -> bool {
        let earlier = if self.forward {
            left.time < right.time
        } else {
            left.time > right.time
        };
        earlier
            || left.round < right.round
            || left.c1 < right.c1
            || self.c2.left_dominance(left.c2, right.c2)
            || (left.on_board && !right.on_board)
    }
}
