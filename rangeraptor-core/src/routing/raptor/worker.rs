//! The round loop of one Range-RAPTOR iteration.
//!
//! The worker owns the control flow: which routes to scan, in which order
//! positions are visited and when events are published. What happens at
//! each position is up to the `RoutingStrategy`.

use fixedbitset::FixedBitSet;
use itertools::Itertools;
use log::{debug, trace, warn};

use super::common::{
    LifeCycleEvent, LifeCycleEventPublisher, RoundTracker, SearchContext, SearchDeadline,
};
use super::strategy::{RoutingStrategy, StrategyResult};
use crate::model::transit::{RouteIdx, Time};

pub struct RangeRaptorWorker<'a, S> {
    ctx: &'a SearchContext<'a>,
    strategy: S,
    round_tracker: RoundTracker,
    deadline: SearchDeadline,
    publisher: LifeCycleEventPublisher,
    timed_out: bool,
    iterations: usize,
}

impl<'a, S: RoutingStrategy<'a>> RangeRaptorWorker<'a, S> {
    pub fn new(
        ctx: &'a SearchContext<'a>,
        strategy: S,
        round_tracker: RoundTracker,
        deadline: SearchDeadline,
        publisher: LifeCycleEventPublisher,
    ) -> Self {
        Self {
            ctx,
            strategy,
            round_tracker,
            deadline,
            publisher,
            timed_out: false,
            iterations: 0,
        }
    }

    pub fn is_timed_out(&self) -> bool {
        self.timed_out
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn route_search_start(&mut self) {
        self.publish(LifeCycleEvent::RouteSearchStart);
    }

    /// Runs all rounds for one departure time. Returns `false` once the
    /// deadline expired, the iteration is then incomplete.
    pub fn run_iteration(&mut self, departure_time: Time) -> bool {
        self.iterations += 1;
        self.publish(LifeCycleEvent::SetupIteration(departure_time));
        self.add_walking_access(departure_time);

        while self.round_tracker.has_more_rounds()
            && (self.strategy.is_new_round_available()
                || self.ctx.access.has_more_rides_after(self.round_tracker.round()))
        {
            if self.deadline.is_expired() {
                debug!("Search deadline expired in iteration {departure_time}");
                self.timed_out = true;
                break;
            }
            let round = self.round_tracker.next_round();
            self.publish(LifeCycleEvent::PrepareForNextRound(round));

            self.find_transit_for_round();
            self.add_on_board_access(departure_time);
            self.publish(LifeCycleEvent::TransitsForRoundComplete);

            self.find_transfers_for_round();
            self.publish(LifeCycleEvent::TransfersForRoundComplete);

            self.add_walking_access(departure_time);
            let reached = self.strategy.destination_reached_current_round();
            self.publish(LifeCycleEvent::RoundComplete(reached));
        }

        self.publish(LifeCycleEvent::IterationComplete);
        !self.timed_out
    }

    #[cfg(test)]
    pub(crate) fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn into_result(self) -> StrategyResult {
        self.strategy.into_result()
    }

    fn publish(&mut self, event: LifeCycleEvent) {
        event.notify(&mut self.round_tracker);
        event.notify(&mut self.strategy);
        self.publisher.publish(event);
    }

    fn add_walking_access(&mut self, departure_time: Time) {
        let round = self.round_tracker.round();
        for access in self.ctx.access.walking(round) {
            self.strategy.set_access_to_stop(access, departure_time);
        }
    }

    fn add_on_board_access(&mut self, departure_time: Time) {
        let round = self.round_tracker.round();
        for access in self.ctx.access.on_board(round) {
            self.strategy.set_access_to_stop(access, departure_time);
        }
    }

    /// Routes serving a stop touched in the previous round, in index order
    fn route_queue(&self, touched: &FixedBitSet) -> Vec<RouteIdx> {
        let provider = self.ctx.provider;
        touched
            .ones()
            .flat_map(|stop| provider.routes_for_stop(stop).iter().copied())
            .sorted_unstable()
            .dedup()
            .collect()
    }

    fn find_transit_for_round(&mut self) {
        let ctx = self.ctx;
        let calculator = &ctx.calculator;
        let touched = self.strategy.stops_touched_previous_round().clone();
        let routes = self.route_queue(&touched);
        trace!(
            "Round {}: {} routes from {} stops",
            self.round_tracker.round(),
            routes.len(),
            touched.count_ones(..)
        );

        for route in routes {
            let loaded = (ctx.provider.pattern(route), ctx.provider.timetable(route));
            let (pattern, timetable) = match loaded {
                (Ok(pattern), Ok(timetable)) => (pattern, timetable),
                (Err(e), _) | (_, Err(e)) => {
                    warn!("Skipping route {route}: {e}");
                    continue;
                }
            };
            if timetable.is_empty() {
                continue;
            }
            let touched_positions = pattern
                .stops
                .iter()
                .positions(|&stop| touched.contains(stop));
            let Some(start) = calculator.first_position(touched_positions) else {
                continue;
            };

            self.strategy.prepare_for_transit_with(pattern, timetable);
            for pos in calculator.pattern_stop_positions(pattern.num_stops(), start) {
                let stop = pattern.stop(pos);
                self.strategy.visit_stop(pos, stop);
                if calculator.alight_allowed(&pattern, pos) {
                    self.strategy.alight(pos, stop);
                }
                if calculator.board_allowed(&pattern, pos) && touched.contains(stop) {
                    self.strategy.board(pos, stop);
                }
            }
        }
    }

    fn find_transfers_for_round(&mut self) {
        let ctx = self.ctx;
        for from_stop in self.strategy.stops_touched_by_transit_current_round() {
            for transfer in ctx.calculator.transfers(ctx.provider, from_stop) {
                self.strategy.transfer(from_stop, transfer);
            }
        }
    }
}
