use fixedbitset::FixedBitSet;

use super::common::WorkerLifeCycle;
use super::regular::StopArrivals;
use crate::model::transit::{Pattern, StopIdx, Time, Timetable, Transfer};
use crate::request::AccessEgress;
use crate::routing::path::Path;

/// Board, alight and transfer decisions applied while the worker scans
/// patterns. The round and iteration come in through `WorkerLifeCycle`.
pub trait RoutingStrategy<'a>: WorkerLifeCycle {
    /// Adds an access leg entered at `departure_time` in the current round
    fn set_access_to_stop(&mut self, access: &AccessEgress, departure_time: Time);

    fn stops_touched_previous_round(&self) -> &FixedBitSet;

    fn stops_touched_by_transit_current_round(&self) -> Vec<StopIdx>;

    fn is_new_round_available(&self) -> bool;

    fn prepare_for_transit_with(&mut self, pattern: Pattern<'a>, timetable: Timetable<'a>);

    /// Called for every scanned position before `alight` and `board`
    fn visit_stop(&mut self, _pos: usize, _stop: StopIdx) {}

    fn alight(&mut self, pos: usize, stop: StopIdx);

    fn board(&mut self, pos: usize, stop: StopIdx);

    fn transfer(&mut self, from_stop: StopIdx, transfer: &Transfer);

    fn destination_reached_current_round(&self) -> bool;

    fn into_result(self) -> StrategyResult;
}

#[derive(Debug, Clone, Default)]
pub struct StrategyResult {
    pub paths: Vec<Path>,
    pub stop_arrivals: Option<StopArrivals>,
    pub best_travel_duration: Option<Time>,
}
