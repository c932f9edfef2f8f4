use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid configuration in {path}: {source}")]
    Config {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to write output: {0}")]
    Output(#[from] serde_json::Error),
    #[error("unknown stop '{0}'")]
    UnknownStop(String),
    #[error("invalid time '{0}', expected HH:MM or HH:MM:SS")]
    InvalidTime(String),
    #[error("logging setup failed: {0}")]
    Logging(String),
    #[error(transparent)]
    Routing(#[from] rangeraptor_core::Error),
}
