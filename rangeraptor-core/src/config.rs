//! Application-scoped search configuration

use log::info;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};

use crate::Error;
use crate::model::transit::Time;
use crate::request::MAX_SEARCH_WINDOW;

/// Sizing of the search window when the request leaves it open
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicSearchWindowCoefficients {
    /// Seconds
    pub min_window: Time,
    /// Seconds
    pub max_window: Time,
    /// Share of the minimum travel duration added to `min_window`
    pub min_travel_duration_coefficient: f64,
    /// The window is rounded up to a multiple of this, seconds
    pub step: Time,
}

impl Default for DynamicSearchWindowCoefficients {
    fn default() -> Self {
        Self {
            min_window: 40 * 60,
            max_window: 3 * 3600,
            min_travel_duration_coefficient: 0.5,
            step: 10 * 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaptorTuningParameters {
    /// Hard limit, requests asking for more are capped
    pub max_number_of_transfers: usize,
    /// Seconds between two range iterations
    pub iteration_departure_step: Time,
    /// Threads for concurrent searches, 0 runs them on the calling thread
    pub search_thread_pool_size: usize,
    /// Check the deadline every N round boundaries
    pub deadline_check_interval: usize,
    pub dynamic_search_window: DynamicSearchWindowCoefficients,
}

impl Default for RaptorTuningParameters {
    fn default() -> Self {
        Self {
            max_number_of_transfers: 12,
            iteration_departure_step: 60,
            search_thread_pool_size: 0,
            deadline_check_interval: 1,
            dynamic_search_window: DynamicSearchWindowCoefficients::default(),
        }
    }
}

/// Tuning parameters plus the thread pool shared by concurrent searches.
///
/// The pool lives until `shutdown` is called or the config is dropped.
#[derive(Debug)]
pub struct RaptorConfig {
    tuning: RaptorTuningParameters,
    pool: Option<ThreadPool>,
}

impl RaptorConfig {
    pub fn new(tuning: RaptorTuningParameters) -> Result<Self, Error> {
        if tuning.iteration_departure_step <= 0 {
            return Err(Error::Configuration(
                "iteration departure step must be positive".to_string(),
            ));
        }
        let window = &tuning.dynamic_search_window;
        if window.min_window < 0
            || window.max_window < window.min_window
            || window.max_window > MAX_SEARCH_WINDOW
            || window.step <= 0
        {
            return Err(Error::Configuration(
                "invalid dynamic search window coefficients".to_string(),
            ));
        }

        let pool = match tuning.search_thread_pool_size {
            0 => None,
            threads => {
                let pool = ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("raptor-{i}"))
                    .build()
                    .map_err(|e| Error::Configuration(e.to_string()))?;
                info!("Started search thread pool with {threads} threads");
                Some(pool)
            }
        };
        Ok(Self { tuning, pool })
    }

    /// Default tuning, no thread pool
    pub fn default_for_test() -> Self {
        Self {
            tuning: RaptorTuningParameters::default(),
            pool: None,
        }
    }

    pub fn tuning(&self) -> &RaptorTuningParameters {
        &self.tuning
    }

    pub fn thread_pool(&self) -> Option<&ThreadPool> {
        self.pool.as_ref()
    }

    pub fn is_multi_threaded(&self) -> bool {
        self.pool.is_some()
    }

    /// Drops the thread pool. Searches started afterwards run on the caller's thread.
    pub fn shutdown(&mut self) {
        if self.pool.take().is_some() {
            info!("Search thread pool shut down");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tuning_deserializes_with_defaults() {
        let tuning: RaptorTuningParameters =
            serde_json::from_str(r#"{"max_number_of_transfers": 4}"#).unwrap();
        assert_eq!(tuning.max_number_of_transfers, 4);
        assert_eq!(tuning.iteration_departure_step, 60);
        assert_eq!(tuning.dynamic_search_window.min_window, 2400);
    }

    #[test]
    fn pool_is_owned_and_shut_down_explicitly() {
        let mut config = RaptorConfig::new(RaptorTuningParameters {
            search_thread_pool_size: 2,
            ..RaptorTuningParameters::default()
        })
        .unwrap();
        assert!(config.is_multi_threaded());
        config.shutdown();
        assert!(!config.is_multi_threaded());
    }

    #[test]
    fn rejects_a_max_window_beyond_the_request_bound() {
        let tuning = RaptorTuningParameters {
            dynamic_search_window: DynamicSearchWindowCoefficients {
                max_window: MAX_SEARCH_WINDOW + 1,
                ..DynamicSearchWindowCoefficients::default()
            },
            ..RaptorTuningParameters::default()
        };
        assert!(matches!(
            RaptorConfig::new(tuning),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn rejects_non_positive_step() {
        let tuning = RaptorTuningParameters {
            iteration_departure_step: 0,
            ..RaptorTuningParameters::default()
        };
        assert!(matches!(
            RaptorConfig::new(tuning),
            Err(Error::Configuration(_))
        ));
    }
}
