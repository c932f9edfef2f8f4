//! Multi-criteria routing: every non-dominated arrival of the previous round
//! boards, and every non-dominated ride alights.

use fixedbitset::FixedBitSet;
use log::debug;

use super::label::{ArrivalComparator, McLabel};
use super::pareto_set::ParetoSet;
use super::pattern_ride::{PatternRide, PatternRideFactory, RideComparator};
use super::state::McStopArrivals;
use crate::model::transit::{Pattern, StopIdx, Time, Timetable, Transfer};
use crate::request::AccessEgress;
use crate::routing::raptor::common::{
    ArrivalArena, ArrivalId, ArrivalKind, SearchContext, StopArrival, TripSearch,
    WorkerLifeCycle, facilitated_boarding, not_allowed_trips,
};
use crate::routing::raptor::destination::DestinationArrivals;
use crate::routing::raptor::strategy::{RoutingStrategy, StrategyResult};

#[derive(Debug, Clone, Copy)]
struct PatternScan<'a> {
    pattern: Pattern<'a>,
    timetable: Timetable<'a>,
    search: TripSearch<'a>,
}

pub struct McRoutingStrategy<'a> {
    ctx: &'a SearchContext<'a>,
    factory: PatternRideFactory,
    arena: ArrivalArena,
    state: McStopArrivals,
    destination: DestinationArrivals<'a>,
    rides: ParetoSet<PatternRide<'a>, RideComparator>,
    round: usize,
    scan: Option<PatternScan<'a>>,
}

impl<'a> McRoutingStrategy<'a> {
    pub fn new(ctx: &'a SearchContext<'a>) -> Self {
        let forward = ctx.calculator.is_forward();
        let c2 = ctx.c2_dominance();
        Self {
            ctx,
            factory: PatternRideFactory::for_dominance(c2),
            arena: ArrivalArena::new(),
            state: McStopArrivals::new(
                ctx.provider.num_stops(),
                ctx.num_legs(),
                ArrivalComparator::new(forward, c2),
            ),
            destination: DestinationArrivals::new(ctx, c2),
            rides: ParetoSet::new(RideComparator::new(forward, c2)),
            round: 0,
            scan: None,
        }
    }

    /// Number of arrivals created so far, dominated ones included
    pub fn num_arrivals(&self) -> usize {
        self.arena.len()
    }

    /// Adds the arrival if its frontier accepts it, then continues it into
    /// the next leg when the stop belongs to the current via location
    fn add_arrival(&mut self, arrival: StopArrival) -> Option<ArrivalId> {
        let id = self.arena.next_id();
        let transfer_source =
            arrival.arrived_on_board() && !matches!(arrival.kind, ArrivalKind::Via { .. });
        let label = McLabel::new(id, &arrival);
        if !self
            .state
            .add(arrival.leg, arrival.stop, label, transfer_source)
        {
            return None;
        }
        self.arena.push(arrival);
        self.destination.check(&self.arena, id);

        let ctx = self.ctx;
        if let Some(via) = ctx.via.get(arrival.leg).filter(|v| v.contains(arrival.stop)) {
            let calculator = &ctx.calculator;
            let copy = arrival.via_copy(
                id,
                arrival.leg,
                calculator.plus(arrival.time, via.min_wait),
                calculator.plus(arrival.time, via.max_wait),
            );
            self.add_arrival(copy);
        }
        Some(id)
    }

    fn board_constrained(
        &mut self,
        scan: &PatternScan<'a>,
        pos: usize,
        prev_id: ArrivalId,
    ) -> bool {
        let ctx = self.ctx;
        let calculator = &ctx.calculator;
        let source = self.arena[prev_id];
        let constraints = ctx.provider.constrained_transfers(scan.pattern.route);
        let Some((trip, constraint)) =
            facilitated_boarding(calculator, &scan.timetable, constraints, pos, &source)
        else {
            return false;
        };
        let stop = scan.pattern.stop(pos);
        let board_time = calculator.board_time(&trip, pos);
        let board_c1 = if constraint.stay_seated {
            source.c1
        } else {
            let wait = calculator.duration_between(source.time, board_time);
            ctx.cost
                .guaranteed_board_c1(source.c1, wait, ctx.provider.stop_board_alight_cost(stop))
        };
        self.rides.add(PatternRide {
            leg: source.leg,
            prev: prev_id,
            board_stop: stop,
            board_pos: pos,
            board_time,
            board_c1,
            relative_c1: ctx
                .cost
                .relative_c1(board_c1, board_time, scan.pattern.reluctance_index),
            trip,
            c2: self
                .factory
                .board_c2(source.c2, stop, &scan.pattern, &ctx.pass_through),
            stay_seated: constraint.stay_seated,
        });
        true
    }
}

impl WorkerLifeCycle for McRoutingStrategy<'_> {
    fn setup_iteration(&mut self, departure_time: Time) {
        self.round = 0;
        self.scan = None;
        self.rides.clear();
        self.state.setup_iteration(departure_time);
        self.destination.setup_iteration(departure_time);
    }

    fn prepare_for_next_round(&mut self, round: usize) {
        self.round = round;
        self.state.prepare_for_next_round(round);
        self.destination.prepare_for_next_round(round);
    }
}

impl<'a> RoutingStrategy<'a> for McRoutingStrategy<'a> {
    fn set_access_to_stop(&mut self, access: &AccessEgress, departure_time: Time) {
        let ctx = self.ctx;
        let calculator = &ctx.calculator;
        let Some(time) = calculator.traverse(access, departure_time) else {
            return;
        };
        if calculator.exceeds_time_limit(time) {
            return;
        }
        let c2 = self.factory.stop_c2(0, access.stop, &ctx.pass_through);
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
        )
        .with_c2(c2);
        self.add_arrival(arrival);
    }

    fn stops_touched_previous_round(&self) -> &FixedBitSet {
        self.state.touched_previous_round()
    }

    fn stops_touched_by_transit_current_round(&self) -> Vec<StopIdx> {
        self.state.stops_reached_by_transit_current_round()
    }

    fn is_new_round_available(&self) -> bool {
        self.state.is_current_round_updated()
    }

    fn prepare_for_transit_with(&mut self, pattern: Pattern<'a>, timetable: Timetable<'a>) {
        self.scan = Some(PatternScan {
            pattern,
            timetable,
            search: TripSearch::new(timetable, self.ctx.calculator.is_forward()),
        });
        self.rides.clear();
    }

    fn visit_stop(&mut self, _pos: usize, stop: StopIdx) {
        if self.factory != PatternRideFactory::PassThrough {
            return;
        }
        let points = &self.ctx.pass_through;
        for ride in self.rides.iter_mut() {
            ride.c2 = points.update_c2_value(ride.c2, stop);
        }
    }

    fn alight(&mut self, pos: usize, stop: StopIdx) {
        let Some(scan) = self.scan else {
            return;
        };
        let ctx = self.ctx;
        let calculator = &ctx.calculator;
        let slack = ctx.slack.alight_slack(scan.pattern.slack_index);
        let stop_cost = ctx.provider.stop_board_alight_cost(stop);
        let rides: Vec<PatternRide<'a>> = self.rides.iter().copied().collect();
        for ride in rides {
            let alight_time = calculator.alight_time(&ride.trip, pos);
            let time = calculator.plus(alight_time, slack);
            if calculator.exceeds_time_limit(time) {
                continue;
            }
            let c1 = ctx.cost.transit_arrival_c1(
                ride.relative_c1,
                alight_time,
                scan.pattern.reluctance_index,
                slack,
                stop_cost,
            );
            let arrival = StopArrival::new(
                stop,
                time,
                self.round,
                c1,
                Some(ride.prev),
                ArrivalKind::Transit {
                    route: scan.pattern.route,
                    trip: ride.trip.index,
                    board_stop: ride.board_stop,
                    board_pos: ride.board_pos,
                    alight_pos: pos,
                    board_time: ride.board_time,
                    alight_time,
                    stay_seated: ride.stay_seated,
                },
            )
            .with_c2(ride.c2)
            .with_leg(ride.leg);
            self.add_arrival(arrival);
        }
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
        let constrained = ctx.constrained_transfers_enabled();
        let slack = ctx
            .slack
            .board_slack_in_round(scan.pattern.slack_index, self.round);
        let stop_cost = ctx.provider.stop_board_alight_cost(stop);

        for prev_id in self.state.previous_round(stop) {
            if constrained && self.board_constrained(&scan, pos, prev_id) {
                continue;
            }
            let prev = self.arena[prev_id];
            let earliest_board_time = calculator.plus(prev.time, slack);
            let excluded = if constrained {
                let constraints = ctx.provider.constrained_transfers(scan.pattern.route);
                not_allowed_trips(calculator, constraints, scan.pattern.route, pos, &prev)
            } else {
                Vec::new()
            };
            let Some(trip) = scan.search.search(pos, earliest_board_time, None, &excluded) else {
                continue;
            };
            let board_time = calculator.board_time(&trip, pos);
            if let ArrivalKind::Via {
                latest_board_time, ..
            } = prev.kind
            {
                if calculator.is_before(latest_board_time, board_time) {
                    continue;
                }
            }

            let wait = calculator.duration_between(prev.time, board_time);
            let board_c1 = ctx.cost.board_c1(prev.c1, prev.round == 0, wait, stop_cost);
            self.rides.add(PatternRide {
                leg: prev.leg,
                prev: prev_id,
                board_stop: stop,
                board_pos: pos,
                board_time,
                board_c1,
                relative_c1: ctx.cost.relative_c1(
                    board_c1,
                    board_time,
                    scan.pattern.reluctance_index,
                ),
                trip,
                c2: self
                    .factory
                    .board_c2(prev.c2, stop, &scan.pattern, &ctx.pass_through),
                stay_seated: false,
            });
        }
    }

    fn transfer(&mut self, from_stop: StopIdx, transfer: &Transfer) {
        let ctx = self.ctx;
        let calculator = &ctx.calculator;
        let transfer_c1 = ctx.cost.transfer_c1(transfer);
        for source_id in self.state.transit_current_round(from_stop) {
            let source = self.arena[source_id];
            let time = calculator.plus(source.time, transfer.duration);
            if calculator.exceeds_time_limit(time) {
                continue;
            }
            let c2 = self
                .factory
                .stop_c2(source.c2, transfer.target_stop, &ctx.pass_through);
            let arrival = StopArrival::new(
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
            )
            .with_c2(c2)
            .with_leg(source.leg);
            self.add_arrival(arrival);
        }
    }

    fn destination_reached_current_round(&self) -> bool {
        self.destination.reached_current_round()
    }

    fn into_result(self) -> StrategyResult {
        debug!(
            "Multi-criteria search created {} arrivals, {} kept",
            self.num_arrivals(),
            self.state.num_labels()
        );
        StrategyResult {
            best_travel_duration: self.destination.best_travel_duration(),
            paths: self.destination.into_paths(),
            stop_arrivals: None,
        }
    }
}
