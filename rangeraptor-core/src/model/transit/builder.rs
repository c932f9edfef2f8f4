//! Assembles `PublicTransitData` from named stops, routes, trips and transfers.
//!
//! Bad input is not fatal: a broken trip or constraint is logged, recorded as
//! a [`DataIssue`] and left out, the rest of the network is still built.

use hashbrown::HashMap;
use itertools::Itertools;
use log::{debug, info, warn};
use thiserror::Error;

use super::data::PublicTransitData;
use super::types::{
    BoardAlight, ConstrainedTransfer, Cost, Route, RouteIdx, Stop, StopIdx, StopTime, Time,
    Transfer, TransferConstraint, TransitMode,
};
use crate::model::time::parse_time;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataIssue {
    #[error("route {route} has fewer than two stops, skipped")]
    TooFewStops { route: String },
    #[error("trip {trip} on route {route} has {found} stop times, expected {expected}, skipped")]
    WrongNumberOfTimes {
        route: String,
        trip: String,
        expected: usize,
        found: usize,
    },
    #[error("trip {trip} on route {route} goes back in time at position {pos}, skipped")]
    DecreasingTimes {
        route: String,
        trip: String,
        pos: usize,
    },
    #[error("trip {trip} on route {route} has unparsable time '{value}', skipped")]
    UnparsableTime {
        route: String,
        trip: String,
        value: String,
    },
    #[error("trips on route {route} overtake each other, trip search falls back to a scan")]
    OvertakingTrips { route: String },
    #[error("constrained transfer {from_trip} -> {to_trip} does not match the timetable, skipped")]
    UnresolvedConstraint { from_trip: String, to_trip: String },
}

#[derive(Debug, Clone)]
struct TripDef {
    id: String,
    times: Vec<StopTime>,
}

/// Collects one route: its stop sequence and trips
#[derive(Debug, Clone)]
pub struct RouteBuilder {
    name: String,
    mode: TransitMode,
    stops: Vec<String>,
    board_alight: Vec<(usize, BoardAlight)>,
    trips: Vec<TripDef>,
    slack_index: usize,
    reluctance_index: usize,
    priority_group: Option<u8>,
    issues: Vec<DataIssue>,
}

impl RouteBuilder {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            mode: TransitMode::Bus,
            stops: Vec::new(),
            board_alight: Vec::new(),
            trips: Vec::new(),
            slack_index: 0,
            reluctance_index: 0,
            priority_group: None,
            issues: Vec::new(),
        }
    }

    pub fn mode(&mut self, mode: TransitMode) -> &mut Self {
        self.mode = mode;
        self
    }

    pub fn stops(&mut self, stops: &[&str]) -> &mut Self {
        self.stops = stops.iter().map(ToString::to_string).collect();
        self
    }

    pub fn board_alight(&mut self, pos: usize, board_alight: BoardAlight) -> &mut Self {
        self.board_alight.push((pos, board_alight));
        self
    }

    pub fn trip(&mut self, id: &str, times: Vec<StopTime>) -> &mut Self {
        self.trips.push(TripDef {
            id: id.to_string(),
            times,
        });
        self
    }

    /// Adds a trip from whitespace separated times, arrival equals departure
    pub fn schedule(&mut self, id: &str, times: &str) -> &mut Self {
        let mut parsed = Vec::new();
        for value in times.split_whitespace() {
            match parse_time(value) {
                Some(t) => parsed.push(StopTime::at(t)),
                None => {
                    warn!("Unparsable time '{value}' in trip {id} on route {}", self.name);
                    self.issues.push(DataIssue::UnparsableTime {
                        route: self.name.clone(),
                        trip: id.to_string(),
                        value: value.to_string(),
                    });
                    return self;
                }
            }
        }
        self.trip(id, parsed)
    }

    pub fn slack_index(&mut self, index: usize) -> &mut Self {
        self.slack_index = index;
        self
    }

    pub fn reluctance_index(&mut self, index: usize) -> &mut Self {
        self.reluctance_index = index;
        self
    }

    /// Puts the route in priority group `group` (0..32)
    pub fn priority_group(&mut self, group: u8) -> &mut Self {
        self.priority_group = Some(group);
        self
    }
}

#[derive(Debug, Clone)]
struct ConstraintDef {
    from_trip: String,
    from_stop: String,
    to_trip: String,
    to_stop: String,
    constraint: TransferConstraint,
}

#[derive(Debug, Clone)]
struct RouteDef {
    builder: RouteBuilder,
    stops: Vec<StopIdx>,
}

#[derive(Debug, Default)]
pub struct TransitDataBuilder {
    stops: Vec<(String, Cost)>,
    stop_index: HashMap<String, StopIdx>,
    routes: Vec<RouteDef>,
    transfers: Vec<(StopIdx, Transfer)>,
    constraints: Vec<ConstraintDef>,
}

impl TransitDataBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the index of the named stop, creating it on first use
    pub fn stop(&mut self, name: &str) -> StopIdx {
        if let Some(&idx) = self.stop_index.get(name) {
            return idx;
        }
        let idx = self.stops.len();
        self.stops.push((name.to_string(), 0));
        self.stop_index.insert(name.to_string(), idx);
        idx
    }

    pub fn stop_cost(&mut self, name: &str, cost: Cost) -> &mut Self {
        let idx = self.stop(name);
        self.stops[idx].1 = cost;
        self
    }

    pub fn route<F>(&mut self, name: &str, build: F) -> &mut Self
    where
        F: FnOnce(&mut RouteBuilder),
    {
        let mut builder = RouteBuilder::new(name);
        build(&mut builder);
        let stops = builder.stops.iter().map(|s| self.stop(s)).collect();
        self.routes.push(RouteDef { builder, stops });
        self
    }

    pub fn transfer(&mut self, from: &str, to: &str, duration: Time) -> &mut Self {
        self.add_transfer(from, to, duration, None)
    }

    pub fn transfer_with_cost(
        &mut self,
        from: &str,
        to: &str,
        duration: Time,
        c1: Cost,
    ) -> &mut Self {
        self.add_transfer(from, to, duration, Some(c1))
    }

    fn add_transfer(
        &mut self,
        from: &str,
        to: &str,
        duration: Time,
        c1: Option<Cost>,
    ) -> &mut Self {
        let from = self.stop(from);
        let target_stop = self.stop(to);
        self.transfers.push((
            from,
            Transfer {
                target_stop,
                duration,
                c1,
            },
        ));
        self
    }

    /// Links alighting `from_trip` at `from_stop` with boarding `to_trip` at `to_stop`
    pub fn constrained_transfer(
        &mut self,
        from_trip: &str,
        from_stop: &str,
        to_trip: &str,
        to_stop: &str,
        constraint: TransferConstraint,
    ) -> &mut Self {
        self.constraints.push(ConstraintDef {
            from_trip: from_trip.to_string(),
            from_stop: from_stop.to_string(),
            to_trip: to_trip.to_string(),
            to_stop: to_stop.to_string(),
            constraint,
        });
        self
    }

    #[allow(clippy::too_many_lines)]
    pub fn build(self) -> PublicTransitData {
        let mut data = PublicTransitData::default();
        let num_stops = self.stops.len();
        let mut stop_routes: Vec<Vec<RouteIdx>> = vec![Vec::new(); num_stops];
        let mut trip_lookup: HashMap<String, (RouteIdx, usize)> = HashMap::new();

        for RouteDef { builder, stops } in self.routes {
            data.issues.extend(builder.issues.iter().cloned());
            if stops.len() < 2 {
                warn!("Route {} has fewer than two stops, skipping", builder.name);
                data.issues.push(DataIssue::TooFewStops {
                    route: builder.name.clone(),
                });
                continue;
            }

            let mut trips = Vec::with_capacity(builder.trips.len());
            for trip in &builder.trips {
                match validate_trip(&builder.name, trip, stops.len()) {
                    Ok(()) => trips.push(trip),
                    Err(issue) => {
                        warn!("{issue}");
                        data.issues.push(issue);
                    }
                }
            }
            trips.sort_by_key(|t| (t.times[0].departure, t.times[stops.len() - 1].arrival));

            let fifo = trips.iter().tuple_windows().all(|(a, b)| {
                a.times
                    .iter()
                    .zip(&b.times)
                    .all(|(x, y)| x.departure <= y.departure && x.arrival <= y.arrival)
            });
            if !fifo {
                warn!("Trips on route {} overtake each other", builder.name);
                data.issues.push(DataIssue::OvertakingTrips {
                    route: builder.name.clone(),
                });
            }

            let route_idx = data.routes.len();
            let stops_start = data.route_stops.len();
            let mut board_alight = vec![BoardAlight::ALLOWED; stops.len()];
            for &(pos, flags) in &builder.board_alight {
                if let Some(slot) = board_alight.get_mut(pos) {
                    *slot = flags;
                }
            }
            for &stop in stops.iter().unique() {
                stop_routes[stop].push(route_idx);
            }
            data.route_stops.extend_from_slice(&stops);
            data.route_board_alight.extend(board_alight);

            let trips_start = data.stop_times.len();
            let first_trip = data.trip_ids.len();
            for (trip_idx, trip) in trips.iter().enumerate() {
                data.stop_times.extend_from_slice(&trip.times);
                data.trip_ids.push(trip.id.clone());
                trip_lookup.insert(trip.id.clone(), (route_idx, trip_idx));
            }

            data.routes.push(Route {
                name: builder.name.clone(),
                mode: builder.mode,
                stops_start,
                num_stops: stops.len(),
                trips_start,
                num_trips: trips.len(),
                first_trip,
                slack_index: builder.slack_index,
                reluctance_index: builder.reluctance_index,
                priority_group: builder.priority_group.map_or(0, |g| 1u32 << (g % 32)),
                fifo,
                constrained_start: 0,
                constrained_len: 0,
            });
        }

        // Transfers grouped by origin, and the same links grouped by destination
        let mut from_groups: Vec<Vec<Transfer>> = vec![Vec::new(); num_stops];
        let mut to_groups: Vec<Vec<Transfer>> = vec![Vec::new(); num_stops];
        for (from, transfer) in self.transfers {
            to_groups[transfer.target_stop].push(Transfer {
                target_stop: from,
                ..transfer
            });
            from_groups[from].push(transfer);
        }

        let resolved =
            resolve_constraints(&data, &trip_lookup, &self.stop_index, &self.constraints);
        let mut route_constraints: Vec<Vec<ConstrainedTransfer>> =
            vec![Vec::new(); data.routes.len()];
        for result in resolved {
            match result {
                Ok(ct) => {
                    route_constraints[ct.from_route].push(ct);
                    if ct.to_route != ct.from_route {
                        route_constraints[ct.to_route].push(ct);
                    }
                }
                Err(issue) => {
                    warn!("{issue}");
                    data.issues.push(issue);
                }
            }
        }
        for (route, constraints) in data.routes.iter_mut().zip(route_constraints) {
            route.constrained_start = data.constrained_transfers.len();
            route.constrained_len = constraints.len();
            data.constrained_transfers.extend(constraints);
        }

        for (idx, ((name, cost), routes)) in self.stops.into_iter().zip(stop_routes).enumerate() {
            let stop = Stop {
                name,
                board_alight_cost: cost,
                routes_start: data.stop_routes.len(),
                routes_len: routes.len(),
                transfers_start: data.transfers.len(),
                transfers_len: from_groups[idx].len(),
                transfers_to_start: data.transfers_to.len(),
                transfers_to_len: to_groups[idx].len(),
            };
            data.stop_routes.extend(routes);
            data.transfers.append(&mut from_groups[idx]);
            data.transfers_to.append(&mut to_groups[idx]);
            data.stops.push(stop);
        }
        data.stop_index = self.stop_index;

        info!(
            "Built transit data: {} stops, {} routes, {} trips, {} transfers",
            data.stops.len(),
            data.routes.len(),
            data.trip_ids.len(),
            data.transfers.len()
        );
        if !data.issues.is_empty() {
            debug!("{} data issues recorded while building", data.issues.len());
        }
        data
    }
}

fn validate_trip(route: &str, trip: &TripDef, num_stops: usize) -> Result<(), DataIssue> {
    if trip.times.len() != num_stops {
        return Err(DataIssue::WrongNumberOfTimes {
            route: route.to_string(),
            trip: trip.id.clone(),
            expected: num_stops,
            found: trip.times.len(),
        });
    }
    let decreasing = |pos: usize| DataIssue::DecreasingTimes {
        route: route.to_string(),
        trip: trip.id.clone(),
        pos,
    };
    for (pos, st) in trip.times.iter().enumerate() {
        if st.departure < st.arrival {
            return Err(decreasing(pos));
        }
        if let Some(next) = trip.times.get(pos + 1) {
            if next.arrival < st.departure {
                return Err(decreasing(pos + 1));
            }
        }
    }
    Ok(())
}

/// Alighting uses the last visit of the stop and boarding the first, which
/// matters only for patterns visiting a stop twice.
fn resolve_constraints(
    data: &PublicTransitData,
    trips: &HashMap<String, (RouteIdx, usize)>,
    stop_index: &HashMap<String, StopIdx>,
    constraints: &[ConstraintDef],
) -> Vec<Result<ConstrainedTransfer, DataIssue>> {
    constraints
        .iter()
        .map(|def| {
            let unresolved = || DataIssue::UnresolvedConstraint {
                from_trip: def.from_trip.clone(),
                to_trip: def.to_trip.clone(),
            };
            let (&(from_route, from_trip), &(to_route, to_trip)) = trips
                .get(&def.from_trip)
                .zip(trips.get(&def.to_trip))
                .ok_or_else(unresolved)?;
            let from_stop = stop_index.get(&def.from_stop).ok_or_else(unresolved)?;
            let to_stop = stop_index.get(&def.to_stop).ok_or_else(unresolved)?;
            let from_pos = data
                .get_route_stops(from_route)
                .ok()
                .and_then(|stops| stops.iter().rposition(|s| s == from_stop))
                .ok_or_else(unresolved)?;
            let to_pos = data
                .get_route_stops(to_route)
                .ok()
                .and_then(|stops| stops.iter().position(|s| s == to_stop))
                .ok_or_else(unresolved)?;
            Ok(ConstrainedTransfer {
                from_route,
                from_trip,
                from_pos,
                to_route,
                to_trip,
                to_pos,
                constraint: def.constraint,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::transit::TransitDataProvider;

    #[test]
    fn builds_flat_tables() {
        let mut builder = TransitDataBuilder::new();
        builder
            .route("R1", |r| {
                r.stops(&["A", "B", "C"])
                    .schedule("t2", "0:12 0:20 0:30")
                    .schedule("t1", "0:02 0:10 0:20");
            })
            .route("R2", |r| {
                r.mode(TransitMode::Tram)
                    .stops(&["C", "D"])
                    .schedule("t3", "0:25 0:35");
            })
            .transfer("B", "D", 120);
        let data = builder.build();

        assert_eq!(data.num_stops(), 4);
        assert_eq!(data.num_routes(), 2);
        assert!(data.issues.is_empty());

        let c = data.stop_by_name("C").unwrap();
        assert_eq!(data.routes_for_stop(c), &[0, 1]);

        // trips are sorted by first departure
        let tt = data.timetable(0).unwrap();
        assert_eq!(tt.trip(0).departure(0), 120);
        assert_eq!(data.trip_id(0, 0), "t1");
        assert_eq!(data.trip_id(0, 1), "t2");
        assert_eq!(data.route_label(1), "TRAM R2");

        let b = data.stop_by_name("B").unwrap();
        let d = data.stop_by_name("D").unwrap();
        assert_eq!(data.transfers_from(b)[0].target_stop, d);
        assert_eq!(data.transfers_to(d)[0].target_stop, b);
        assert!(data.transfers_from(d).is_empty());
    }

    #[test]
    fn skips_broken_trips_and_records_issues() {
        let mut builder = TransitDataBuilder::new();
        builder.route("R1", |r| {
            r.stops(&["A", "B", "C"])
                .schedule("ok", "0:02 0:10 0:20")
                .schedule("backwards", "0:02 0:10 0:05")
                .schedule("short", "0:02 0:10")
                .schedule("garbage", "0:02 xx 0:20");
        });
        builder.route("lonely", |r| {
            r.stops(&["A"]);
        });
        let data = builder.build();

        assert_eq!(data.routes.len(), 1);
        assert_eq!(data.routes[0].num_trips, 1);
        assert_eq!(data.issues.len(), 4);
        assert!(data.issues.iter().any(|i| matches!(i, DataIssue::DecreasingTimes { pos: 2, .. })));
        assert!(data.issues.iter().any(|i| matches!(i, DataIssue::TooFewStops { .. })));
    }

    #[test]
    fn detects_overtaking_trips() {
        let mut builder = TransitDataBuilder::new();
        builder.route("R1", |r| {
            r.stops(&["A", "B"])
                .schedule("slow", "0:00 0:30")
                .schedule("fast", "0:05 0:15");
        });
        let data = builder.build();
        assert!(!data.routes[0].fifo);
        assert_eq!(
            data.issues,
            vec![DataIssue::OvertakingTrips {
                route: "R1".to_string()
            }]
        );
    }

    #[test]
    fn resolves_constrained_transfers_under_both_routes() {
        let mut builder = TransitDataBuilder::new();
        builder
            .route("R1", |r| {
                r.stops(&["A", "B"]).schedule("t1", "0:02 0:10");
            })
            .route("R2", |r| {
                r.stops(&["B", "C"]).schedule("t2", "0:10 0:20");
            })
            .constrained_transfer("t1", "B", "t2", "B", TransferConstraint::stay_seated())
            .constrained_transfer("t1", "B", "nope", "B", TransferConstraint::guaranteed());
        let data = builder.build();

        let ct = data.constrained_transfers(0);
        assert_eq!(ct.len(), 1);
        assert_eq!(ct, data.constrained_transfers(1));
        assert_eq!((ct[0].from_pos, ct[0].to_pos), (1, 0));
        assert!(ct[0].constraint.stay_seated);
        assert_eq!(data.issues.len(), 1);
    }
}
