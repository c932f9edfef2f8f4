use serde::Serialize;

use crate::model::transit::{StopIdx, Time};

/// Per-stop outcome of a standard search, used as a heuristic for the
/// multi-criteria search and for sizing the search window
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StopArrivals {
    pub best_times: Vec<Option<Time>>,
    pub best_transit_times: Vec<Option<Time>>,
    /// Transfers needed to first reach the stop
    pub min_transfers: Vec<Option<usize>>,
    pub destination_travel_duration: Option<Time>,
}

impl StopArrivals {
    pub fn is_reached(&self, stop: StopIdx) -> bool {
        self.best_times.get(stop).is_some_and(Option::is_some)
    }

    pub fn best_time(&self, stop: StopIdx) -> Option<Time> {
        self.best_times.get(stop).copied().flatten()
    }

    pub fn min_transfers(&self, stop: StopIdx) -> Option<usize> {
        self.min_transfers.get(stop).copied().flatten()
    }
}
