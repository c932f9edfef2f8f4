//! Data model for public transportation routing
//!
//! Contains types and structures for representing a transit network.

pub mod time;
pub mod transit;

pub use time::{duration_to_str, parse_time, time_to_str};
pub use transit::data::PublicTransitData;
pub use transit::types::{Cost, RouteIdx, StopIdx, Time};
