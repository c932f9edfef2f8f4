// Standard single-criterion search
mod best_times;
mod state;
mod stop_arrivals;
mod strategy;

pub use best_times::BestTimes;
pub use state::{RoundSlot, StdStopArrivalState};
pub use stop_arrivals::StopArrivals;
pub use strategy::StdRoutingStrategy;
