//! Path reconstruction and comparison

mod comparator;
mod mapper;
mod path;

pub use comparator::PathComparator;
pub use mapper::PathMapper;
pub use path::{Path, PathLeg, cost_to_str};
