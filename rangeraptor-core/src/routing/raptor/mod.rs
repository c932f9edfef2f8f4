// Range-RAPTOR workers, strategies and their state

pub mod common;
pub mod destination;
pub mod multicriteria;
mod range_raptor;
pub mod regular;
pub mod strategy;
mod worker;

pub use range_raptor::{RangeRaptor, RangeRaptorResult};
pub use strategy::{RoutingStrategy, StrategyResult};
pub use worker::RangeRaptorWorker;
