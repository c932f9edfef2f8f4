use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Search timed out before any path was found")]
    Timeout,
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Data inconsistency: {0}")]
    DataInconsistency(String),
    #[error("Invalid stop index {0}")]
    InvalidStop(usize),
    #[error("Invalid route index {0}")]
    InvalidRoute(usize),
    #[error("Search interrupted: {0}")]
    Interrupted(String),
    #[error("Configuration error: {0}")]
    Configuration(String),
}
