//! Transit data model

pub mod builder;
pub mod data;
pub mod provider;
pub mod types;

pub use builder::{DataIssue, RouteBuilder, TransitDataBuilder};
pub use data::PublicTransitData;
pub use provider::{Pattern, Timetable, TransitDataProvider, TripSchedule};
pub use types::{
    BoardAlight, ConstrainedTransfer, Cost, Route, RouteIdx, Stop, StopIdx, StopTime, Time,
    Transfer, TransferConstraint, TransitMode,
};
