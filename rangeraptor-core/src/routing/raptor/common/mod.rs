// Building blocks shared by the standard and multi-criteria workers
mod access;
mod arrivals;
mod calculator;
mod constrained;
mod context;
mod cost;
mod deadline;
mod lifecycle;
mod round_tracker;
mod slack;
mod trip_search;

pub use access::{AccessPaths, EgressPaths};
pub use arrivals::{ArrivalArena, ArrivalId, ArrivalKind, StopArrival};
pub use calculator::TransitCalculator;
pub(crate) use constrained::{facilitated_boarding, not_allowed_trips};
pub use context::SearchContext;
pub use cost::CostCalculator;
pub use deadline::SearchDeadline;
pub use lifecycle::{LifeCycleEvent, LifeCycleEventPublisher, WorkerLifeCycle};
pub use round_tracker::RoundTracker;
pub use slack::SearchSlack;
pub use trip_search::TripSearch;
