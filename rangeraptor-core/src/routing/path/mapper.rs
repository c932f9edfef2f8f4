//! Turns a destination arrival into a `Path`.
//!
//! The arrival chain is walked back to the access arrival, then laid out in
//! real time order. Transit legs keep their scheduled times; street legs
//! are moved as close to the transit legs as slack allows, so the rider
//! leaves as late as possible and arrives as early as possible.

use super::path::{Path, PathLeg};
use crate::model::transit::{Cost, RouteIdx, StopIdx, Time, TransitDataProvider};
use crate::request::{AccessEgress, SlackParameters};
use crate::routing::raptor::common::{ArrivalArena, ArrivalId, ArrivalKind, StopArrival};

#[derive(Debug, Clone)]
enum Hop {
    Access {
        leg: AccessEgress,
        c1: Cost,
    },
    Transit {
        route: RouteIdx,
        trip: usize,
        from_stop: StopIdx,
        to_stop: StopIdx,
        board_pos: usize,
        alight_pos: usize,
        board_time: Time,
        alight_time: Time,
        stay_seated: bool,
        c1: Cost,
    },
    Transfer {
        from_stop: StopIdx,
        to_stop: StopIdx,
        duration: Time,
        c1: Cost,
    },
    Egress {
        leg: AccessEgress,
        c1: Cost,
    },
}

impl Hop {
    fn duration(&self) -> Time {
        match self {
            Hop::Access { leg, .. } | Hop::Egress { leg, .. } => leg.duration,
            Hop::Transit {
                board_time,
                alight_time,
                ..
            } => alight_time - board_time,
            Hop::Transfer { duration, .. } => *duration,
        }
    }

    fn transit_times(&self) -> Option<(Time, Time)> {
        match self {
            Hop::Transit {
                board_time,
                alight_time,
                ..
            } => Some((*board_time, *alight_time)),
            _ => None,
        }
    }
}

pub struct PathMapper<'a> {
    provider: &'a dyn TransitDataProvider,
    slack: &'a SlackParameters,
    forward: bool,
}

impl<'a> PathMapper<'a> {
    pub fn new(
        provider: &'a dyn TransitDataProvider,
        slack: &'a SlackParameters,
        forward: bool,
    ) -> Self {
        Self {
            provider,
            slack,
            forward,
        }
    }

    /// Arrivals from the access arrival to `last`, via copies left out.
    ///
    /// # Panics
    ///
    /// On a cycle in the chain, which would be a bug in the search.
    fn chain<'r>(arena: &'r ArrivalArena, last: ArrivalId) -> Vec<&'r StopArrival> {
        let mut chain = Vec::new();
        let mut current = Some(last);
        while let Some(id) = current {
            let arrival = &arena[id];
            if let Some(previous) = arrival.previous {
                assert!(previous < id, "cycle in stop arrival chain at {id:?}");
            }
            if !matches!(arrival.kind, ArrivalKind::Via { .. }) {
                chain.push(arrival);
            }
            current = arrival.previous;
        }
        chain.reverse();
        chain
    }

    /// Hops in search order, each with its share of the cost
    fn search_hops(chain: &[&StopArrival], egress: &AccessEgress) -> Vec<Hop> {
        let mut hops = Vec::with_capacity(chain.len() + 1);
        let mut prev_c1 = 0;
        for arrival in chain {
            let c1 = arrival.c1 - prev_c1;
            prev_c1 = arrival.c1;
            hops.push(match arrival.kind {
                ArrivalKind::Access { leg, .. } => Hop::Access { leg, c1 },
                ArrivalKind::Transit {
                    route,
                    trip,
                    board_stop,
                    board_pos,
                    alight_pos,
                    board_time,
                    alight_time,
                    stay_seated,
                } => Hop::Transit {
                    route,
                    trip,
                    from_stop: board_stop,
                    to_stop: arrival.stop,
                    board_pos,
                    alight_pos,
                    board_time,
                    alight_time,
                    stay_seated,
                    c1,
                },
                ArrivalKind::Transfer {
                    from_stop,
                    duration,
                    ..
                } => Hop::Transfer {
                    from_stop,
                    to_stop: arrival.stop,
                    duration,
                    c1,
                },
                ArrivalKind::Via { .. } => unreachable!("via arrivals are not part of the chain"),
            });
        }
        hops.push(Hop::Egress {
            leg: *egress,
            c1: egress.c1,
        });
        hops
    }

    /// Reverses a reverse-search hop list into real time order
    fn into_real_order(hops: Vec<Hop>) -> Vec<Hop> {
        hops.into_iter()
            .rev()
            .map(|hop| match hop {
                Hop::Access { leg, c1 } => Hop::Egress { leg, c1 },
                Hop::Egress { leg, c1 } => Hop::Access { leg, c1 },
                Hop::Transit {
                    route,
                    trip,
                    from_stop,
                    to_stop,
                    board_pos,
                    alight_pos,
                    board_time,
                    alight_time,
                    stay_seated,
                    c1,
                } => Hop::Transit {
                    route,
                    trip,
                    from_stop: to_stop,
                    to_stop: from_stop,
                    board_pos: alight_pos,
                    alight_pos: board_pos,
                    board_time: alight_time,
                    alight_time: board_time,
                    stay_seated,
                    c1,
                },
                Hop::Transfer {
                    from_stop,
                    to_stop,
                    duration,
                    c1,
                } => Hop::Transfer {
                    from_stop: to_stop,
                    to_stop: from_stop,
                    duration,
                    c1,
                },
            })
            .collect()
    }

    fn slack_index(&self, route: RouteIdx) -> usize {
        self.provider.pattern(route).map_or(0, |p| p.slack_index)
    }

    fn board_slack_before(&self, hop: &Hop) -> Time {
        match hop {
            Hop::Transit { route, .. } => self.slack.board_slack(self.slack_index(*route)),
            _ => 0,
        }
    }

    fn alight_slack_after(&self, hop: &Hop) -> Time {
        match hop {
            Hop::Transit { route, .. } => self.slack.alight_slack(self.slack_index(*route)),
            _ => 0,
        }
    }

    /// Start and end of every hop. `anchor` is a hop with known times, the
    /// ones before it are packed backwards and the ones after forwards.
    fn schedule(
        &self,
        hops: &[Hop],
        anchor: usize,
        anchor_times: (Time, Time),
    ) -> Vec<(Time, Time)> {
        let mut times = vec![(0, 0); hops.len()];
        times[anchor] = anchor_times;

        for i in (0..anchor).rev() {
            times[i] = hops[i].transit_times().unwrap_or_else(|| {
                let end = times[i + 1].0 - self.board_slack_before(&hops[i + 1]);
                let end = match &hops[i] {
                    Hop::Access { leg, .. } => leg.latest_arrival_time(end).unwrap_or(end),
                    _ => end,
                };
                (end - hops[i].duration(), end)
            });
        }
        for i in anchor + 1..hops.len() {
            times[i] = hops[i].transit_times().unwrap_or_else(|| {
                let start = times[i - 1].1 + self.alight_slack_after(&hops[i - 1]);
                let start = match &hops[i] {
                    Hop::Egress { leg, .. } => leg.earliest_departure_time(start).unwrap_or(start),
                    _ => start,
                };
                (start, start + hops[i].duration())
            });
        }
        times
    }

    pub fn map(
        &self,
        arena: &ArrivalArena,
        last: ArrivalId,
        egress: &AccessEgress,
        c1: Cost,
        c2: Option<u32>,
    ) -> Path {
        let chain = Self::chain(arena, last);
        let search_hops = Self::search_hops(&chain, egress);
        let hops = if self.forward {
            search_hops
        } else {
            Self::into_real_order(search_hops)
        };

        let first_transit = hops
            .iter()
            .enumerate()
            .find_map(|(i, hop)| hop.transit_times().map(|times| (i, times)));
        let (anchor, anchor_times) = match first_transit {
            Some(found) => found,
            None => {
                // No transit: keep the street legs where the search put them
                let access_arrival = chain[0].time;
                if self.forward {
                    let start = access_arrival - hops[0].duration();
                    (0, (start, access_arrival))
                } else {
                    let last = hops.len() - 1;
                    (last, (access_arrival, access_arrival + hops[last].duration()))
                }
            }
        };
        let times = self.schedule(&hops, anchor, anchor_times);

        let mut number_of_rides = 0;
        let mut stay_seated = 0;
        for hop in &hops {
            match hop {
                Hop::Access { leg, .. } | Hop::Egress { leg, .. } => {
                    number_of_rides += leg.num_rides;
                }
                Hop::Transit {
                    stay_seated: seated,
                    ..
                } => {
                    number_of_rides += 1;
                    stay_seated += usize::from(*seated);
                }
                Hop::Transfer { .. } => {}
            }
        }

        let legs: Vec<PathLeg> = hops
            .iter()
            .zip(&times)
            .map(|(hop, &(start_time, end_time))| self.leg(hop, start_time, end_time))
            .collect();

        Path {
            start_time: times.first().map_or(0, |t| t.0),
            end_time: times.last().map_or(0, |t| t.1),
            c1,
            c2,
            number_of_transfers: number_of_rides.saturating_sub(1).saturating_sub(stay_seated),
            legs,
        }
    }

    fn stop_name(&self, stop: StopIdx) -> String {
        self.provider.stop_name(stop).to_string()
    }

    fn leg(&self, hop: &Hop, start_time: Time, end_time: Time) -> PathLeg {
        match hop {
            Hop::Access { leg, c1 } => PathLeg::Access {
                to_stop: leg.stop,
                to_stop_name: self.stop_name(leg.stop),
                start_time,
                end_time,
                num_rides: leg.num_rides,
                c1: *c1,
            },
            Hop::Transit {
                route,
                trip,
                from_stop,
                to_stop,
                board_pos,
                alight_pos,
                stay_seated,
                c1,
                ..
            } => {
                let stops = self
                    .provider
                    .pattern(*route)
                    .ok()
                    .and_then(|p| p.stops.get(*board_pos..=*alight_pos).map(<[_]>::to_vec))
                    .unwrap_or_else(|| vec![*from_stop, *to_stop]);
                PathLeg::Transit {
                    route: *route,
                    route_label: self.provider.route_label(*route),
                    trip: *trip,
                    trip_id: self.provider.trip_id(*route, *trip).to_string(),
                    from_stop: *from_stop,
                    from_stop_name: self.stop_name(*from_stop),
                    to_stop: *to_stop,
                    to_stop_name: self.stop_name(*to_stop),
                    stops,
                    start_time,
                    end_time,
                    stay_seated: *stay_seated,
                    c1: *c1,
                }
            }
            Hop::Transfer {
                from_stop,
                to_stop,
                c1,
                ..
            } => PathLeg::Transfer {
                from_stop: *from_stop,
                from_stop_name: self.stop_name(*from_stop),
                to_stop: *to_stop,
                to_stop_name: self.stop_name(*to_stop),
                start_time,
                end_time,
                c1: *c1,
            },
            Hop::Egress { leg, c1 } => PathLeg::Egress {
                from_stop: leg.stop,
                from_stop_name: self.stop_name(leg.stop),
                start_time,
                end_time,
                num_rides: leg.num_rides,
                c1: *c1,
            },
        }
    }
}
