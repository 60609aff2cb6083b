//! partitionrs
//!
//! Lazy fixed-size partitioning for Rust.
//!
//! `partitionrs` groups the elements of a sequence into consecutive,
//! ordered partitions of at most `N` elements. It is designed as a small,
//! composable primitive for:
//!
//! - batched inserts and uploads
//! - bounded work units for worker pools
//! - record-oriented file processing
//!
//! Three kinds of input share one abstraction, [`PartitionSource`]:
//!
//! - arrays, vectors, slices and other collections (list-backed, traversable
//!   any number of times)
//! - plain or fallible iterators (pull-backed, single pass)
//! - a byte resource plus a conversion function (pull-backed, and the
//!   source owns and closes the resource)
//!
//! The crate intentionally:
//! - does NOT parse any particular format (see [`decode`] for simple helpers)
//! - does NOT buffer unbounded inputs, unless asked to materialize them
//! - does NOT support changing the partition size mid-traversal
//!
//! # Sequential
//!
//! ```
//! use partitionrs::{PartitionConfig, PartitionError, PartitionSource};
//!
//! fn main() -> Result<(), PartitionError> {
//!     let config = PartitionConfig::new(3)?;
//!     let mut source = PartitionSource::from_vec(vec![1, 2, 3, 4, 5, 6, 7], config)?;
//!
//!     for partition in source.traversal()? {
//!         let partition = partition?;
//!         println!("partition {:?}", &*partition);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Concurrent
//!
//! ```
//! use partitionrs::{PartitionConfig, PartitionSource, ThreadingPolicy};
//!
//! let config = PartitionConfig::new(2)?.with_threading(ThreadingPolicy::Fixed(2));
//! let mut source = PartitionSource::from_cursor(0..10u64, config)?;
//!
//! source.for_each_concurrent(|partition| {
//!     let _sum: u64 = partition.iter().sum();
//! })?;
//! # Ok::<(), partitionrs::PartitionError>(())
//! ```
//!
//! # Async (feature = "async-stream")
//!
//! ```ignore
//! use futures_util::{stream, StreamExt};
//! use partitionrs::{partition_stream, PartitionConfig};
//!
//! async fn demo() -> Result<(), partitionrs::PartitionError> {
//!     let upstream = stream::iter((0..10).map(Ok::<_, std::io::Error>));
//!     let mut partitions = partition_stream(upstream, PartitionConfig::new(4)?)?;
//!
//!     while let Some(partition) = partitions.next().await {
//!         println!("partition {}", partition?.len());
//!     }
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod cursor;
mod error;
mod partition;
mod source;

pub mod decode;

#[cfg(feature = "async-stream")]
mod async_stream;

//
// Public surface (intentionally tiny)
//

pub use config::{DEFAULT_PARTITION_SIZE, PartitionConfig, ThreadingPolicy};
pub use cursor::PartitionIter;
pub use error::{BoxError, PartitionError};
pub use partition::Partition;
pub use source::{PartitionSource, ResourceReader};

#[cfg(feature = "async-stream")]
pub use async_stream::{PartitionStream, partition_stream};
