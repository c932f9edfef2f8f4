//! Command-line front-end of the Range-RAPTOR engine: TOML configuration,
//! JSON timetable and request files, JSON and plain text output.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod request;
pub mod timetable;

pub use app::{execute, run};
pub use error::CliError;
