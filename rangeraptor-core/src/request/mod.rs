//! Search request: legs, criteria parameters and validation

pub mod access_egress;
pub mod cost;
pub mod request;
pub mod slack;
pub mod via;

pub use access_egress::{AccessEgress, OpeningHours, WALK_C1_PER_SECOND};
pub use cost::{CostParameters, RelaxCost};
pub use request::{
    MAX_SEARCH_WINDOW, RaptorProfile, RaptorRequest, RaptorRequestBuilder, SearchDirection,
    SearchParams,
};
pub use slack::SlackParameters;
pub use via::{DEFAULT_MAX_WAIT, PassThroughPoint, ViaLocation};
