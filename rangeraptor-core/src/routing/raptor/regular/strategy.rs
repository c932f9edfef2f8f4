//! Standard and min-travel-duration routing.
//!
//! One best arrival per round and stop. Boarding takes the earliest trip
//! reachable from the best arrival of the previous round; transfers start
//! from the best on-board arrival only.

use fixedbitset::FixedBitSet;

use super::best_times::BestTimes;
use super::state::{RoundSlot, StdStopArrivalState};
use super::stop_arrivals::StopArrivals;
use crate::model::transit::{
    Cost, Pattern, StopIdx, Time, Timetable, Transfer, TripSchedule,
};
use crate::request::AccessEgress;
use crate::routing::raptor::common::{
    ArrivalArena, ArrivalId, ArrivalKind, SearchContext, StopArrival, TripSearch,
    WorkerLifeCycle, facilitated_boarding, not_allowed_trips,
};
use crate::routing::raptor::destination::DestinationArrivals;
use crate::routing::raptor::multicriteria::C2Dominance;
use crate::routing::raptor::strategy::{RoutingStrategy, StrategyResult};

#[derive(Debug, Clone, Copy)]
struct PatternScan<'a> {
    pattern: Pattern<'a>,
    timetable: Timetable<'a>,
    search: TripSearch<'a>,
}

#[derive(Debug, Clone, Copy)]
struct OnTrip<'a> {
    trip: TripSchedule<'a>,
    board_pos: usize,
    board_stop: StopIdx,
    board_time: Time,
    relative_c1: Cost,
    prev: ArrivalId,
    stay_seated: bool,
    /// Wait before boarding, removed from arrivals in min-travel-duration mode
    shift: Time,
}

pub struct StdRoutingStrategy<'a> {
    ctx: &'a SearchContext<'a>,
    min_travel_duration: bool,
    arena: ArrivalArena,
    best_times: BestTimes,
    state: StdStopArrivalState,
    destination: DestinationArrivals<'a>,
    round: usize,
    scan: Option<PatternScan<'a>>,
    on_trip: Option<OnTrip<'a>>,
}

impl<'a> StdRoutingStrategy<'a> {
    pub fn new(ctx: &'a SearchContext<'a>, max_rounds: usize, min_travel_duration: bool) -> Self {
        let num_stops = ctx.provider.num_stops();
        Self {
            ctx,
            min_travel_duration,
            arena: ArrivalArena::new(),
            best_times: BestTimes::new(num_stops, ctx.calculator),
            state: StdStopArrivalState::new(num_stops, max_rounds),
            destination: DestinationArrivals::new(ctx, C2Dominance::None),
            round: 0,
            scan: None,
            on_trip: None,
        }
    }

    /// Stores an on-board arrival already known to improve the best transit time
    fn commit_transit_arrival(&mut self, arrival: StopArrival) {
        let (stop, time) = (arrival.stop, arrival.time);
        let id = self.arena.push(arrival);
        self.state.set_best_transit(self.round, stop, id);
        if self.best_times.update_new_best_time(stop, time) {
            self.state.set_best(self.round, stop, id);
        }
        self.destination.check(&self.arena, id);
    }

    /// Stores an arrival already known to be the new best time
    fn commit_arrival(&mut self, arrival: StopArrival) {
        let stop = arrival.stop;
        let id = self.arena.push(arrival);
        self.state.set_best(self.round, stop, id);
        self.destination.check(&self.arena, id);
    }

    fn board_constrained(&mut self, scan: &PatternScan<'a>, pos: usize, slot: RoundSlot) -> bool {
        let ctx = self.ctx;
        let calculator = &ctx.calculator;
        let Some(source_id) = slot.best_transit else {
            return false;
        };
        let source = self.arena[source_id];
        let constraints = ctx.provider.constrained_transfers(scan.pattern.route);
        let Some((trip, constraint)) =
            facilitated_boarding(calculator, &scan.timetable, constraints, pos, &source)
        else {
            return false;
        };
        if let Some(on_trip) = self.on_trip {
            let better = if calculator.is_forward() {
                trip.index < on_trip.trip.index
            } else {
                trip.index > on_trip.trip.index
            };
            if !better {
                return false;
            }
        }

        let stop = scan.pattern.stop(pos);
        let board_time = calculator.board_time(&trip, pos);
        let c1 = if constraint.stay_seated {
            source.c1
        } else {
            let wait = calculator.duration_between(source.time, board_time);
            ctx.cost
                .guaranteed_board_c1(source.c1, wait, ctx.provider.stop_board_alight_cost(stop))
        };
        self.on_trip = Some(OnTrip {
            trip,
            board_pos: pos,
            board_stop: stop,
            board_time,
            relative_c1: ctx
                .cost
                .relative_c1(c1, board_time, scan.pattern.reluctance_index),
            prev: source_id,
            stay_seated: constraint.stay_seated,
            shift: 0,
        });
        true
    }

    /// Moves the boarding of the current trip to `pos` if that removes waiting
    fn board_same_trip(
        &mut self,
        on_trip: OnTrip<'a>,
        scan: &PatternScan<'a>,
        pos: usize,
        prev_id: ArrivalId,
        earliest_board_time: Time,
    ) {
        let ctx = self.ctx;
        let calculator = &ctx.calculator;
        let board_time = calculator.board_time(&on_trip.trip, pos);
        if calculator.is_before(board_time, earliest_board_time) {
            return;
        }
        let shift = calculator.duration_between(earliest_board_time, board_time);
        if shift >= on_trip.shift {
            return;
        }
        let prev = self.arena[prev_id];
        let stop = scan.pattern.stop(pos);
        let wait = calculator.duration_between(prev.time, board_time);
        let c1 = ctx.cost.board_c1(
            prev.c1,
            prev.round == 0,
            wait,
            ctx.provider.stop_board_alight_cost(stop),
        );
        self.on_trip = Some(OnTrip {
            board_pos: pos,
            board_stop: stop,
            board_time,
            relative_c1: ctx
                .cost
                .relative_c1(c1, board_time, scan.pattern.reluctance_index),
            prev: prev_id,
            shift,
            ..on_trip
        });
    }
}

impl WorkerLifeCycle for StdRoutingStrategy<'_> {
    fn setup_iteration(&mut self, departure_time: Time) {
        self.round = 0;
        self.scan = None;
        self.on_trip = None;
        self.best_times.setup_iteration(departure_time);
        self.destination.setup_iteration(departure_time);
    }

    fn prepare_for_next_round(&mut self, round: usize) {
        self.round = round;
        self.best_times.prepare_for_next_round(round);
        self.destination.prepare_for_next_round(round);
    }
}

impl<'a> RoutingStrategy<'a> for StdRoutingStrategy<'a> {
    fn set_access_to_stop(&mut self, access: &AccessEgress, departure_time: Time) {
        let calculator = &self.ctx.calculator;
        let Some(time) = calculator.traverse(access, departure_time) else {
            return;
        };
        if calculator.exceeds_time_limit(time) {
            return;
        }
        let arrival = StopArrival::new(
            access.stop,
            time,
            self.round,
            access.c1,
            None,
            ArrivalKind::Access {
                leg: *access,
                departure_time,
            },
        );
        if access.stop_reached_on_board() {
            if self
                .best_times
                .update_best_transit_arrival_time(access.stop, time)
            {
                self.commit_transit_arrival(arrival);
            }
        } else if self.best_times.update_new_best_time(access.stop, time) {
            self.commit_arrival(arrival);
        }
    }

    fn stops_touched_previous_round(&self) -> &FixedBitSet {
        self.best_times.reached_last_round()
    }

    fn stops_touched_by_transit_current_round(&self) -> Vec<StopIdx> {
        self.best_times.stops_reached_by_transit_current_round()
    }

    fn is_new_round_available(&self) -> bool {
        self.best_times.is_current_round_updated()
    }

    fn prepare_for_transit_with(&mut self, pattern: Pattern<'a>, timetable: Timetable<'a>) {
        self.scan = Some(PatternScan {
            pattern,
            timetable,
            search: TripSearch::new(timetable, self.ctx.calculator.is_forward()),
        });
        self.on_trip = None;
    }

    fn alight(&mut self, pos: usize, stop: StopIdx) {
        let (Some(on_trip), Some(scan)) = (self.on_trip, self.scan) else {
            return;
        };
        let ctx = self.ctx;
        let calculator = &ctx.calculator;
        let slack = ctx.slack.alight_slack(scan.pattern.slack_index);
        let alight_time = calculator.alight_time(&on_trip.trip, pos);
        let mut time = calculator.plus(alight_time, slack);
        if self.min_travel_duration {
            time = calculator.minus(time, on_trip.shift);
        }
        if calculator.exceeds_time_limit(time)
            || !self.best_times.update_best_transit_arrival_time(stop, time)
        {
            return;
        }
        let c1 = ctx.cost.transit_arrival_c1(
            on_trip.relative_c1,
            alight_time,
            scan.pattern.reluctance_index,
            slack,
            ctx.provider.stop_board_alight_cost(stop),
        );
        let arrival = StopArrival::new(
            stop,
            time,
            self.round,
            c1,
            Some(on_trip.prev),
            ArrivalKind::Transit {
                route: scan.pattern.route,
                trip: on_trip.trip.index,
                board_stop: on_trip.board_stop,
                board_pos: on_trip.board_pos,
                alight_pos: pos,
                board_time: on_trip.board_time,
                alight_time,
                stay_seated: on_trip.stay_seated,
            },
        );
        self.commit_transit_arrival(arrival);
    }

    fn board(&mut self, pos: usize, stop: StopIdx) {
        let Some(scan) = self.scan else {
            return;
        };
        if self.round == 0 {
            return;
        }
        let ctx = self.ctx;
        let calculator = &ctx.calculator;
        let slot = self.state.slot(self.round - 1, stop);
        let Some(prev_id) = slot.best else {
            return;
        };
        if ctx.constrained_transfers_enabled() && self.board_constrained(&scan, pos, slot) {
            return;
        }

        let prev = self.arena[prev_id];
        let slack = ctx
            .slack
            .board_slack_in_round(scan.pattern.slack_index, self.round);
        let earliest_board_time = calculator.plus(prev.time, slack);

        if self.min_travel_duration {
            if let Some(on_trip) = self.on_trip {
                self.board_same_trip(on_trip, &scan, pos, prev_id, earliest_board_time);
                return;
            }
        }

        let excluded = if ctx.constrained_transfers_enabled() && slot.best == slot.best_transit {
            let constraints = ctx.provider.constrained_transfers(scan.pattern.route);
            not_allowed_trips(calculator, constraints, scan.pattern.route, pos, &prev)
        } else {
            Vec::new()
        };
        let current = self.on_trip.map(|t| t.trip.index);
        let Some(trip) = scan
            .search
            .search(pos, earliest_board_time, current, &excluded)
        else {
            return;
        };

        let board_time = calculator.board_time(&trip, pos);
        let wait = calculator.duration_between(prev.time, board_time);
        let c1 = ctx.cost.board_c1(
            prev.c1,
            prev.round == 0,
            wait,
            ctx.provider.stop_board_alight_cost(stop),
        );
        self.on_trip = Some(OnTrip {
            trip,
            board_pos: pos,
            board_stop: stop,
            board_time,
            relative_c1: ctx
                .cost
                .relative_c1(c1, board_time, scan.pattern.reluctance_index),
            prev: prev_id,
            stay_seated: false,
            shift: calculator.duration_between(earliest_board_time, board_time),
        });
    }

    fn transfer(&mut self, from_stop: StopIdx, transfer: &Transfer) {
        let ctx = self.ctx;
        let calculator = &ctx.calculator;
        let Some(source_id) = self.state.slot(self.round, from_stop).best_transit else {
            return;
        };
        let source = self.arena[source_id];
        let time = calculator.plus(source.time, transfer.duration);
        if calculator.exceeds_time_limit(time)
            || !self.best_times.update_new_best_time(transfer.target_stop, time)
        {
            return;
        }
        let transfer_c1 = ctx.cost.transfer_c1(transfer);
        self.commit_arrival(StopArrival::new(
            transfer.target_stop,
            time,
            self.round,
            source.c1 + transfer_c1,
            Some(source_id),
            ArrivalKind::Transfer {
                from_stop,
                duration: transfer.duration,
                c1: transfer_c1,
            },
        ));
    }

    fn destination_reached_current_round(&self) -> bool {
        self.destination.reached_current_round()
    }

    fn into_result(self) -> StrategyResult {
        let (best_times, best_transit_times) = self.best_times.to_options();
        let best_travel_duration = self.destination.best_travel_duration();
        StrategyResult {
            stop_arrivals: Some(StopArrivals {
                best_times,
                best_transit_times,
                min_transfers: self.state.min_transfers(),
                destination_travel_duration: best_travel_duration,
            }),
            best_travel_duration,
            paths: self.destination.into_paths(),
        }
    }
}
