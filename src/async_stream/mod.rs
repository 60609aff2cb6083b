//! Async streaming support for partitioning.
//!
//! This module partitions any `futures_core::Stream`, making it
//! runtime-agnostic and compatible with tokio, async-std, smol, and other
//! async runtimes.
//!
//! - [`partition_stream`] - Creates an async stream of partitions
//!
//! This module requires the `async-stream` feature to be enabled.

mod stream;

pub use stream::{PartitionStream, partition_stream};
