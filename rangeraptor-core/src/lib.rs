//! Range-RAPTOR journey search over a public transit timetable.
//!
//! Standard, min-travel-duration and multi-criteria searches share one round
//! loop; the profile picks the routing strategy plugged into it.

pub mod config;
pub mod error;
pub mod model;
pub mod prelude;
pub mod request;
pub mod routing;

pub use error::Error;
pub use model::{Cost, PublicTransitData, RouteIdx, StopIdx, Time};
