//! Partition sources.
//!
//! - [`PartitionSource`] - Normalizes arrays, collections, cursors and
//!   resources into a list-backed or pull-backed source
//! - [`ResourceReader`] - Read view handed to resource conversion functions

mod engine;
mod parallel;
mod resource;

pub use engine::PartitionSource;
pub use resource::ResourceReader;
