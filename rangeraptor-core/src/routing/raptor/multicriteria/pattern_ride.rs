//! Trips boarded during one pattern scan

use super::group_priority::merge_group_ids;
use super::label::C2Dominance;
use super::pareto_set::ParetoComparator;
use super::pass_through::PassThroughPointsService;
use crate::model::transit::{Cost, Pattern, StopIdx, Time, TripSchedule};
use crate::routing::raptor::common::ArrivalId;

/// A boarded trip, alive until the scan of the pattern ends.
///
/// `relative_c1` is the board cost with the riding cost up to the board time
/// taken out, so alighting anywhere downstream is a single addition.
#[derive(Debug, Clone, Copy)]
pub struct PatternRide<'a> {
    pub leg: usize,
    pub prev: ArrivalId,
    pub board_stop: StopIdx,
    pub board_pos: usize,
    pub board_time: Time,
    pub board_c1: Cost,
    pub relative_c1: Cost,
    pub trip: TripSchedule<'a>,
    pub c2: u32,
    pub stay_seated: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct RideComparator {
    forward: bool,
    c2: C2Dominance,
}

impl RideComparator {
    pub fn new(forward: bool, c2: C2Dominance) -> Self {
        Self { forward, c2 }
    }
}

impl ParetoComparator<PatternRide<'_>> for RideComparator {
    fn left_dominance_exists(&self, left: &PatternRide<'_>, right: &PatternRide<'_>) -> bool {
        // Rides of different via legs never compete
        if left.leg != right.leg {
            return true;
        }
        let better_trip = if self.forward {
            left.trip.index < right.trip.index
        } else {
            left.trip.index > right.trip.index
        };
        better_trip
            || left.relative_c1 < right.relative_c1
            || self.c2.left_dominance(left.c2, right.c2)
    }
}

/// How c2 evolves along a journey, chosen once per request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternRideFactory {
    /// c2 is carried unchanged
    Default,
    /// c2 counts pass-through points visited
    PassThrough,
    /// c2 collects the priority groups of the routes ridden
    GroupPriority,
}

impl PatternRideFactory {
    pub fn for_dominance(c2: C2Dominance) -> Self {
        match c2 {
            C2Dominance::None => PatternRideFactory::Default,
            C2Dominance::PassThrough => PatternRideFactory::PassThrough,
            C2Dominance::GroupPriority => PatternRideFactory::GroupPriority,
        }
    }

    pub fn board_c2(
        self,
        prev_c2: u32,
        stop: StopIdx,
        pattern: &Pattern<'_>,
        points: &PassThroughPointsService,
    ) -> u32 {
        match self {
            PatternRideFactory::Default => prev_c2,
            PatternRideFactory::PassThrough => points.update_c2_value(prev_c2, stop),
            PatternRideFactory::GroupPriority => merge_group_ids(prev_c2, pattern.priority_group),
        }
    }

    /// c2 after reaching or passing `stop` outside a boarding
    pub fn stop_c2(self, c2: u32, stop: StopIdx, points: &PassThroughPointsService) -> u32 {
        match self {
            PatternRideFactory::PassThrough => points.update_c2_value(c2, stop),
            PatternRideFactory::Default | PatternRideFactory::GroupPriority => c2,
        }
    }
}
