use fixedbitset::FixedBitSet;

use crate::model::transit::{StopIdx, Time};
use crate::routing::raptor::common::{TransitCalculator, WorkerLifeCycle};

/// Best overall and best on-board arrival time per stop.
///
/// Times survive across iterations so later iterations are pruned by
/// earlier ones; the touched sets are per round.
#[derive(Debug, Clone)]
pub struct BestTimes {
    calculator: TransitCalculator,
    times: Vec<Time>,
    transit_times: Vec<Time>,
    reached_current_round: FixedBitSet,
    reached_last_round: FixedBitSet,
    reached_by_transit_current_round: FixedBitSet,
}

impl BestTimes {
    pub fn new(num_stops: usize, calculator: TransitCalculator) -> Self {
        let unreached = calculator.unreached_time();
        Self {
            calculator,
            times: vec![unreached; num_stops],
            transit_times: vec![unreached; num_stops],
            reached_current_round: FixedBitSet::with_capacity(num_stops),
            reached_last_round: FixedBitSet::with_capacity(num_stops),
            reached_by_transit_current_round: FixedBitSet::with_capacity(num_stops),
        }
    }

    pub fn time(&self, stop: StopIdx) -> Time {
        self.times[stop]
    }

    pub fn transit_time(&self, stop: StopIdx) -> Time {
        self.transit_times[stop]
    }

    pub fn is_stop_reached(&self, stop: StopIdx) -> bool {
        self.times[stop] != self.calculator.unreached_time()
    }

    pub fn is_stop_reached_by_transit(&self, stop: StopIdx) -> bool {
        self.transit_times[stop] != self.calculator.unreached_time()
    }

    /// Commits `time` if it beats the best time at the stop
    pub fn update_new_best_time(&mut self, stop: StopIdx, time: Time) -> bool {
        if self.calculator.is_before(time, self.times[stop]) {
            self.times[stop] = time;
            self.reached_current_round.insert(stop);
            true
        } else {
            false
        }
    }

    /// Commits an on-board arrival if it beats the best on-board time. The
    /// overall best time is updated separately by the caller.
    pub fn update_best_transit_arrival_time(&mut self, stop: StopIdx, time: Time) -> bool {
        if self.calculator.is_before(time, self.transit_times[stop]) {
            self.transit_times[stop] = time;
            self.reached_by_transit_current_round.insert(stop);
            true
        } else {
            false
        }
    }

    pub fn reached_last_round(&self) -> &FixedBitSet {
        &self.reached_last_round
    }

    pub fn is_current_round_updated(&self) -> bool {
        !self.reached_current_round.is_clear()
    }

    pub fn stops_reached_by_transit_current_round(&self) -> Vec<StopIdx> {
        self.reached_by_transit_current_round.ones().collect()
    }

    /// Best times with unreached stops as `None`
    pub fn to_options(&self) -> (Vec<Option<Time>>, Vec<Option<Time>>) {
        let unreached = self.calculator.unreached_time();
        let map = |times: &[Time]| -> Vec<Option<Time>> {
            times
                .iter()
                .map(|&t| (t != unreached).then_some(t))
                .collect()
        };
        (map(&self.times), map(&self.transit_times))
    }
}

impl WorkerLifeCycle for BestTimes {
    fn setup_iteration(&mut self, _departure_time: Time) {
        self.reached_current_round.clear();
        self.reached_last_round.clear();
        self.reached_by_transit_current_round.clear();
    }

    fn prepare_for_next_round(&mut self, _round: usize) {
        std::mem::swap(&mut self.reached_current_round, &mut self.reached_last_round);
        self.reached_current_round.clear();
        self.reached_by_transit_current_round.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::SearchDirection;

    fn best_times() -> BestTimes {
        let calculator = TransitCalculator::new(SearchDirection::Forward, Some(0), None, 0, 60);
        BestTimes::new(3, calculator)
    }

    #[test]
    fn transit_time_is_tracked_separately() {
        let mut best = best_times();
        assert!(best.update_new_best_time(1, 100));
        assert!(!best.update_new_best_time(1, 100));
        assert!(best.update_best_transit_arrival_time(1, 150));
        assert!(!best.update_new_best_time(1, 150));
        assert!(best.is_stop_reached_by_transit(1));
        assert!(best.is_stop_reached(1));
        assert_eq!(best.stops_reached_by_transit_current_round(), vec![1]);
    }

    #[test]
    fn rounds_swap_touched_sets() {
        let mut best = best_times();
        best.setup_iteration(0);
        best.update_new_best_time(0, 10);
        assert!(best.is_current_round_updated());
        best.prepare_for_next_round(1);
        assert!(!best.is_current_round_updated());
        assert!(best.reached_last_round().contains(0));

        best.setup_iteration(0);
        assert!(best.reached_last_round().is_clear());
        // Best times survive a new iteration
        assert!(!best.update_new_best_time(0, 20));
    }
}
