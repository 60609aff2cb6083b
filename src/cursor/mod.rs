//! Traversal over a partitioned source.
//!
//! - [`PartitionIter`] - Stateful cursor yielding one partition per step

mod iter;

pub use iter::PartitionIter;
pub(crate) use iter::Upstream;
