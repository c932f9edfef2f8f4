//! Application configuration read from a TOML file.
//!
//! Every section is optional:
//!
//! ```toml
//! [logging]
//! level = "debug"
//!
//! [raptor]
//! max_number_of_transfers = 8
//! search_thread_pool_size = 2
//!
//! [routing]
//! alternative_profile = "multi_criteria"
//! timeout_ms = 5000
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use rangeraptor_core::prelude::{RaptorProfile, RaptorTuningParameters};
use serde::Deserialize;

use crate::error::CliError;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub raptor: RaptorTuningParameters,
    pub routing: RoutingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, `RUST_LOG` takes precedence
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Runs a second search with this profile next to the requested one and
    /// merges the paths of both
    pub alternative_profile: Option<RaptorProfile>,
    pub timeout_ms: Option<u64>,
}

impl RoutingConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

impl AppConfig {
    pub fn from_file(path: &Path) -> Result<Self, CliError> {
        let content = fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| CliError::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}
