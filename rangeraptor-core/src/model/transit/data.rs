//! Public transit data structure and methods to work with it

use hashbrown::HashMap;

use super::builder::DataIssue;
use super::provider::{Pattern, Timetable, TransitDataProvider};
use super::types::{
    BoardAlight, ConstrainedTransfer, Cost, Route, RouteIdx, Stop, StopIdx, StopTime, Transfer,
};
use crate::Error;

/// Main public transit data structure
/// based on original microsoft paper
#[derive(Debug, Clone, Default)]
pub struct PublicTransitData {
    /// All routes
    pub routes: Vec<Route>,
    /// Stops for each route
    pub route_stops: Vec<StopIdx>,
    /// Board/alight permission for each route stop
    pub route_board_alight: Vec<BoardAlight>,
    /// Schedule for each route stop
    pub stop_times: Vec<StopTime>,
    /// All stops
    pub stops: Vec<Stop>,
    /// Routes through each stop
    pub stop_routes: Vec<RouteIdx>,
    /// Transfers leaving each stop
    pub transfers: Vec<Transfer>,
    /// Transfers arriving at each stop
    pub transfers_to: Vec<Transfer>,
    /// Constrained transfers grouped by route, each one listed under both routes
    pub constrained_transfers: Vec<ConstrainedTransfer>,
    /// Trip ids, routes index into it through `Route::first_trip`
    pub trip_ids: Vec<String>,
    pub stop_index: HashMap<String, StopIdx>,
    /// Problems found and skipped while building
    pub issues: Vec<DataIssue>,
}

impl PublicTransitData {
    /// check if such stop exists
    pub(crate) fn check_stop(&self, stop: StopIdx) -> Result<(), Error> {
        if stop >= self.stops.len() {
            Err(Error::InvalidStop(stop))
        } else {
            Ok(())
        }
    }

    /// Stops for specific route
    pub(crate) fn get_route_stops(&self, route_id: RouteIdx) -> Result<&[StopIdx], Error> {
        self.routes
            .get(route_id)
            .ok_or(Error::InvalidRoute(route_id))
            .and_then(|route| {
                let end = route.stops_start + route.num_stops;
                if end > self.route_stops.len() {
                    Err(Error::InvalidRoute(route_id))
                } else {
                    Ok(&self.route_stops[route.stops_start..end])
                }
            })
    }

    /// Looks up a stop by its name
    pub fn stop_by_name(&self, name: &str) -> Option<StopIdx> {
        self.stop_index.get(name).copied()
    }

    fn stop_slice<'a, T>(
        &self,
        items: &'a [T],
        stop: StopIdx,
        by: fn(&Stop) -> (usize, usize),
    ) -> &'a [T] {
        match self.stops.get(stop) {
            Some(s) => {
                let (start, len) = by(s);
                items.get(start..start + len).unwrap_or(&[])
            }
            None => &[],
        }
    }
}

impl TransitDataProvider for PublicTransitData {
    fn num_stops(&self) -> usize {
        self.stops.len()
    }

    fn num_routes(&self) -> usize {
        self.routes.len()
    }

    fn routes_for_stop(&self, stop: StopIdx) -> &[RouteIdx] {
        self.stop_slice(&self.stop_routes, stop, |s| (s.routes_start, s.routes_len))
    }

    fn pattern(&self, route: RouteIdx) -> Result<Pattern<'_>, Error> {
        let stops = self.get_route_stops(route)?;
        let r = &self.routes[route];
        Ok(Pattern {
            route,
            stops,
            board_alight: &self.route_board_alight[r.stops_start..r.stops_start + r.num_stops],
            slack_index: r.slack_index,
            reluctance_index: r.reluctance_index,
            priority_group: r.priority_group,
        })
    }

    fn timetable(&self, route: RouteIdx) -> Result<Timetable<'_>, Error> {
        let r = self.routes.get(route).ok_or(Error::InvalidRoute(route))?;
        let end = r.trips_start + r.num_trips * r.num_stops;
        if end > self.stop_times.len() {
            return Err(Error::InvalidRoute(route));
        }
        Ok(Timetable::new(
            route,
            &self.stop_times[r.trips_start..end],
            r.num_stops,
            r.num_trips,
            r.fifo,
        ))
    }

    fn transfers_from(&self, stop: StopIdx) -> &[Transfer] {
        self.stop_slice(&self.transfers, stop, |s| (s.transfers_start, s.transfers_len))
    }

    fn transfers_to(&self, stop: StopIdx) -> &[Transfer] {
        self.stop_slice(&self.transfers_to, stop, |s| {
            (s.transfers_to_start, s.transfers_to_len)
        })
    }

    fn constrained_transfers(&self, route: RouteIdx) -> &[ConstrainedTransfer] {
        self.routes.get(route).map_or(&[], |r| {
            let end = r.constrained_start + r.constrained_len;
            &self.constrained_transfers[r.constrained_start..end]
        })
    }

    fn stop_board_alight_cost(&self, stop: StopIdx) -> Cost {
        self.stops.get(stop).map_or(0, |s| s.board_alight_cost)
    }

    fn stop_name(&self, stop: StopIdx) -> &str {
        self.stops.get(stop).map_or("?", |s| s.name.as_str())
    }

    fn route_label(&self, route: RouteIdx) -> String {
        self.routes.get(route).map_or_else(
            || format!("route {route}"),
            |r| format!("{} {}", r.mode.label(), r.name),
        )
    }

    fn trip_id(&self, route: RouteIdx, trip: usize) -> &str {
        self.routes
            .get(route)
            .and_then(|r| self.trip_ids.get(r.first_trip + trip))
            .map_or("?", String::as_str)
    }

    fn validate_stop(&self, stop: StopIdx) -> Result<(), Error> {
        self.check_stop(stop)
    }
}
