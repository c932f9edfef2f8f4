//! Search window sizing: the initial window from a heuristic travel
//! duration and the window for the next page of results.

use crate::config::DynamicSearchWindowCoefficients;
use crate::model::transit::Time;

const DEFAULT_PAGING_DELTAS: [Time; 5] = [4 * 3600, 2 * 3600, 3600, 30 * 60, 20 * 60];

#[derive(Debug, Clone)]
pub struct SearchWindowCalculator {
    coefficients: DynamicSearchWindowCoefficients,
}

impl SearchWindowCalculator {
    pub fn new(coefficients: &DynamicSearchWindowCoefficients) -> Self {
        Self {
            coefficients: coefficients.clone(),
        }
    }

    /// Window for a journey taking at least `min_travel_duration`. Without a
    /// known duration the destination may be far away, the largest window is used.
    pub fn calculate(&self, min_travel_duration: Option<Time>) -> Time {
        let c = &self.coefficients;
        let Some(duration) = min_travel_duration else {
            return c.max_window;
        };
        let raw = f64::from(c.min_window)
            + c.min_travel_duration_coefficient * f64::from(duration.max(0));
        let step = f64::from(c.step.max(1));
        let rounded = (raw / step).ceil() * step;
        if rounded >= f64::from(c.max_window) {
            return c.max_window.max(c.min_window);
        }
        (rounded as Time).clamp(c.min_window, c.max_window)
    }
}

/// Window for the next search after a page of results.
///
/// Too few results grow the window, the fewer found the larger the step.
/// Too many results shrink it to end where the first dropped result started.
#[derive(Debug, Clone)]
pub struct PagingSearchWindowAdjuster {
    min_window: Time,
    max_window: Time,
    deltas: Vec<Time>,
}

impl PagingSearchWindowAdjuster {
    pub fn new(min_window: Time, max_window: Time, deltas: Vec<Time>) -> Self {
        Self {
            min_window,
            max_window,
            deltas,
        }
    }

    pub fn from_coefficients(coefficients: &DynamicSearchWindowCoefficients) -> Self {
        Self::new(
            coefficients.min_window,
            coefficients.max_window,
            DEFAULT_PAGING_DELTAS.to_vec(),
        )
    }

    pub fn increase_or_keep(&self, window_used: Time, n_requested: usize, n_found: usize) -> Time {
        if n_found >= n_requested || self.deltas.is_empty() {
            return window_used;
        }
        let index = n_found * self.deltas.len() / n_requested.max(1);
        let delta = self.deltas[index.min(self.deltas.len() - 1)];
        window_used.saturating_add(delta).min(self.max_window).max(window_used)
    }

    /// `offset` is the time from the window start to the first result that
    /// did not fit the page
    pub fn decrease(&self, window_used: Time, offset: Time) -> Time {
        let minutes = offset.max(0) / 60 * 60;
        minutes.max(self.min_window).min(window_used)
    }
}
