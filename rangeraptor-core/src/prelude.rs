// Re-export key components
pub use crate::config::{DynamicSearchWindowCoefficients, RaptorConfig, RaptorTuningParameters};
pub use crate::model::transit::{
    BoardAlight, DataIssue, StopTime, TransferConstraint, TransitDataBuilder, TransitDataProvider,
    TransitMode,
};
pub use crate::model::{PublicTransitData, duration_to_str, parse_time, time_to_str};
pub use crate::request::{
    AccessEgress, CostParameters, PassThroughPoint, RaptorProfile, RaptorRequest,
    RaptorRequestBuilder, RelaxCost, SearchDirection, SlackParameters, ViaLocation,
};
pub use crate::routing::path::{Path, PathLeg};
pub use crate::routing::raptor::common::{LifeCycleEvent, LifeCycleEventPublisher};
pub use crate::routing::raptor::regular::StopArrivals;
pub use crate::routing::{
    ConcurrentCompositeRaptorRouter, DefaultRaptorRouter, PathMerger, RaptorResponse,
    RaptorRouter, RaptorService, merge_paths,
};

// Core types
pub use crate::Error;
pub use crate::{Cost, RouteIdx, StopIdx, Time};
