// Multi-criteria search: Pareto frontiers, c2 criteria and pattern rides
pub mod group_priority;
mod label;
mod pareto_set;
mod pass_through;
mod pattern_ride;
mod state;
mod strategy;

pub use label::{ArrivalComparator, C2Dominance, McLabel};
pub use pareto_set::{ParetoComparator, ParetoSet};
pub use pass_through::PassThroughPointsService;
pub use pattern_ride::{PatternRide, PatternRideFactory, RideComparator};
pub use state::McStopArrivals;
pub use strategy::McRoutingStrategy;
