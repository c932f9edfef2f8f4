use log::debug;

use super::common::SearchContext;
use super::strategy::{RoutingStrategy, StrategyResult};
use super::worker::RangeRaptorWorker;

/// Outcome of one Range-RAPTOR search
#[derive(Debug, Clone, Default)]
pub struct RangeRaptorResult {
    pub result: StrategyResult,
    pub timed_out: bool,
    pub iterations: usize,
}

/// Range-RAPTOR: runs one worker iteration per departure minute of the
/// search window, reusing the state of the previous iteration.
///
/// Forward searches go from the latest departure to the earliest, so each
/// iteration only has to find journeys that beat what later departures
/// already found. Reverse searches go from the earliest arrival to the latest.
pub struct RangeRaptor<'a, S> {
    ctx: &'a SearchContext<'a>,
    worker: RangeRaptorWorker<'a, S>,
}

impl<'a, S: RoutingStrategy<'a>> RangeRaptor<'a, S> {
    pub fn new(ctx: &'a SearchContext<'a>, worker: RangeRaptorWorker<'a, S>) -> Self {
        Self { ctx, worker }
    }

    pub fn route(mut self) -> RangeRaptorResult {
        let minutes = self.ctx.calculator.range_raptor_minutes();
        debug!(
            "Range raptor: {} iterations over a {}s window",
            minutes.len(),
            self.ctx.calculator.search_window()
        );

        self.worker.route_search_start();
        for departure_time in minutes {
            if !self.worker.run_iteration(departure_time) {
                break;
            }
        }

        let timed_out = self.worker.is_timed_out();
        let iterations = self.worker.iterations();
        RangeRaptorResult {
            result: self.worker.into_result(),
            timed_out,
            iterations,
        }
    }
}
