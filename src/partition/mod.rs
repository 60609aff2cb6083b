//! Partition types.
//!
//! - [`Partition`] - One ordered, read-only group of source elements

mod data;

pub use data::Partition;
