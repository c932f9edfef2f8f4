//! Read-only view of the timetable consumed by the search

use super::types::{
    BoardAlight, ConstrainedTransfer, Cost, RouteIdx, StopIdx, StopTime, Time, Transfer,
};
use crate::Error;

/// Stop sequence of a route together with its per-route parameters
#[derive(Debug, Clone, Copy)]
pub struct Pattern<'a> {
    pub route: RouteIdx,
    pub stops: &'a [StopIdx],
    pub board_alight: &'a [BoardAlight],
    pub slack_index: usize,
    pub reluctance_index: usize,
    pub priority_group: u32,
}

impl<'a> Pattern<'a> {
    pub fn num_stops(&self) -> usize {
        self.stops.len()
    }

    pub fn stop(&self, pos: usize) -> StopIdx {
        self.stops[pos]
    }

    pub fn can_board(&self, pos: usize) -> bool {
        self.board_alight[pos].board
    }

    pub fn can_alight(&self, pos: usize) -> bool {
        self.board_alight[pos].alight
    }
}

/// Trip schedules of one route, sorted by departure at the first stop
#[derive(Debug, Clone, Copy)]
pub struct Timetable<'a> {
    pub route: RouteIdx,
    stop_times: &'a [StopTime],
    num_stops: usize,
    num_trips: usize,
    fifo: bool,
}

impl<'a> Timetable<'a> {
    pub fn new(
        route: RouteIdx,
        stop_times: &'a [StopTime],
        num_stops: usize,
        num_trips: usize,
        fifo: bool,
    ) -> Self {
        debug_assert_eq!(stop_times.len(), num_stops * num_trips);
        Self {
            route,
            stop_times,
            num_stops,
            num_trips,
            fifo,
        }
    }

    pub fn num_trips(&self) -> usize {
        self.num_trips
    }

    pub fn is_empty(&self) -> bool {
        self.num_trips == 0
    }

    /// Trips never overtake each other, so times at any position are sorted
    pub fn is_fifo(&self) -> bool {
        self.fifo
    }

    pub fn trip(&self, index: usize) -> TripSchedule<'a> {
        let start = index * self.num_stops;
        TripSchedule {
            index,
            times: &self.stop_times[start..start + self.num_stops],
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TripSchedule<'a> {
    pub index: usize,
    times: &'a [StopTime],
}

impl TripSchedule<'_> {
    pub fn arrival(&self, pos: usize) -> Time {
        self.times[pos].arrival
    }

    pub fn departure(&self, pos: usize) -> Time {
        self.times[pos].departure
    }
}

/// Everything the search needs from the transit model.
///
/// Implementations are shared read-only between concurrent searches.
pub trait TransitDataProvider: Send + Sync {
    fn num_stops(&self) -> usize;

    fn num_routes(&self) -> usize;

    /// Routes serving the stop, empty for an unknown stop
    fn routes_for_stop(&self, stop: StopIdx) -> &[RouteIdx];

    fn pattern(&self, route: RouteIdx) -> Result<Pattern<'_>, Error>;

    fn timetable(&self, route: RouteIdx) -> Result<Timetable<'_>, Error>;

    /// Walking transfers leaving the stop
    fn transfers_from(&self, stop: StopIdx) -> &[Transfer];

    /// Walking transfers arriving at the stop, `target_stop` is the origin
    fn transfers_to(&self, stop: StopIdx) -> &[Transfer];

    /// Constraints where the route is either the from or the to side
    fn constrained_transfers(&self, route: RouteIdx) -> &[ConstrainedTransfer];

    fn stop_board_alight_cost(&self, stop: StopIdx) -> Cost;

    fn stop_name(&self, stop: StopIdx) -> &str;

    /// Mode and name, e.g. `BUS R1`
    fn route_label(&self, route: RouteIdx) -> String;

    fn trip_id(&self, route: RouteIdx, trip: usize) -> &str;

    fn validate_stop(&self, stop: StopIdx) -> Result<(), Error> {
        if stop < self.num_stops() {
            Ok(())
        } else {
            Err(Error::InvalidStop(stop))
        }
    }
}
