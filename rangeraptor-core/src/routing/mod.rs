// Journey search: Range-RAPTOR workers, paths and routers

pub mod path;
pub mod raptor;
mod router;
mod search_window;
mod service;

pub use router::{
    ConcurrentCompositeRaptorRouter, DefaultRaptorRouter, PathMerger, RaptorRouter, merge_paths,
};
pub use search_window::{PagingSearchWindowAdjuster, SearchWindowCalculator};
pub use service::{RaptorResponse, RaptorService};
