use log::trace;

use super::common::{ArrivalArena, ArrivalId, SearchContext, WorkerLifeCycle};
use super::multicriteria::{C2Dominance, ParetoSet};
use crate::model::transit::Time;
use crate::routing::path::{Path, PathComparator, PathMapper};

/// Paths found so far, kept as a Pareto set across all iterations
pub struct DestinationArrivals<'a> {
    ctx: &'a SearchContext<'a>,
    mapper: PathMapper<'a>,
    paths: ParetoSet<Path, PathComparator>,
    c2: C2Dominance,
    iteration_departure: Time,
    reached_current_round: bool,
    best_travel_duration: Option<Time>,
}

impl<'a> DestinationArrivals<'a> {
    pub fn new(ctx: &'a SearchContext<'a>, c2: C2Dominance) -> Self {
        let forward = ctx.calculator.is_forward();
        let comparator = PathComparator::new(
            forward,
            ctx.profile(),
            ctx.request.search_params.timetable,
            ctx.request.cost.relax_c1_at_destination,
            c2,
        );
        Self {
            ctx,
            mapper: PathMapper::new(ctx.provider, &ctx.request.slack, forward),
            paths: ParetoSet::new(comparator),
            c2,
            iteration_departure: 0,
            reached_current_round: false,
            best_travel_duration: None,
        }
    }

    /// Adds a path for every egress leg usable from the arrival
    pub fn check(&mut self, arena: &ArrivalArena, id: ArrivalId) {
        let ctx = self.ctx;
        let arrival = &arena[id];
        if arrival.leg + 1 != ctx.num_legs() {
            return;
        }
        if self.c2 == C2Dominance::PassThrough
            && !ctx.pass_through.accept_c2_at_destination(arrival.c2)
        {
            return;
        }
        let calculator = &ctx.calculator;
        for egress in ctx.egress.for_stop(arrival.stop) {
            // Two walks in a row are not allowed
            if !egress.has_rides() && !arrival.arrived_on_board() {
                continue;
            }
            let Some(time) = calculator.traverse(egress, arrival.time) else {
                continue;
            };
            if calculator.exceeds_time_limit(time) {
                continue;
            }
            let duration = calculator.duration_between(self.iteration_departure, time);
            self.best_travel_duration = Some(
                self.best_travel_duration
                    .map_or(duration, |best| best.min(duration)),
            );

            let c2 = self.c2.is_active().then_some(arrival.c2);
            let path = self.mapper.map(arena, id, egress, arrival.c1 + egress.c1, c2);
            trace!("Destination reached: {path}");
            if self.paths.add(path) {
                self.reached_current_round = true;
            }
        }
    }

    pub fn reached_current_round(&self) -> bool {
        self.reached_current_round
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Shortest time from an iteration departure to the destination
    pub fn best_travel_duration(&self) -> Option<Time> {
        self.best_travel_duration
    }

    pub fn into_paths(self) -> Vec<Path> {
        let mut paths = self.paths.into_vec();
        paths.sort();
        paths
    }
}

impl WorkerLifeCycle for DestinationArrivals<'_> {
    fn setup_iteration(&mut self, departure_time: Time) {
        self.iteration_departure = departure_time;
        self.reached_current_round = false;
    }

    fn prepare_for_next_round(&mut self, _round: usize) {
        self.reached_current_round = false;
    }
}
