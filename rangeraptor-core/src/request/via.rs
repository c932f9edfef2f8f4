use crate::model::transit::{StopIdx, Time};

pub const DEFAULT_MAX_WAIT: Time = 24 * 3600;

/// A place the journey must transfer at, in request order.
///
/// The journey continues from any of `stops` no sooner than `min_wait` and
/// no later than `max_wait` after arriving there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViaLocation {
    pub label: String,
    pub min_wait: Time,
    pub max_wait: Time,
    pub stops: Vec<StopIdx>,
}

impl ViaLocation {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            min_wait: 0,
            max_wait: DEFAULT_MAX_WAIT,
            stops: Vec::new(),
        }
    }

    pub fn with_min_wait(mut self, min_wait: Time) -> Self {
        self.min_wait = min_wait;
        self
    }

    pub fn with_max_wait(mut self, max_wait: Time) -> Self {
        self.max_wait = max_wait;
        self
    }

    pub fn stop(mut self, stop: StopIdx) -> Self {
        self.stops.push(stop);
        self
    }

    pub fn contains(&self, stop: StopIdx) -> bool {
        self.stops.contains(&stop)
    }
}

/// A place the journey must pass, on board or not, in request order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassThroughPoint {
    pub label: String,
    pub stops: Vec<StopIdx>,
}

impl PassThroughPoint {
    pub fn new(label: &str, stops: &[StopIdx]) -> Self {
        Self {
            label: label.to_string(),
            stops: stops.to_vec(),
        }
    }

    pub fn contains(&self, stop: StopIdx) -> bool {
        self.stops.contains(&stop)
    }
}
