//! Configuration for partitioning behavior.
//!
//! - [`PartitionConfig`] - Partition size and concurrent processing policy
//! - [`ThreadingPolicy`] - Where concurrently processed partitions run
//!
//! # Example
//!
//! ```
//! use partitionrs::{PartitionConfig, ThreadingPolicy};
//!
//! let config = PartitionConfig::new(128)?
//!     .with_threading(ThreadingPolicy::Fixed(4));
//!
//! assert_eq!(config.size(), 128);
//! # Ok::<(), partitionrs::PartitionError>(())
//! ```

mod threading;

pub use threading::ThreadingPolicy;

use crate::error::PartitionError;

/// Default number of elements per partition.
pub const DEFAULT_PARTITION_SIZE: usize = 64;

/// Configuration for a partitioned source.
///
/// The partition size is the maximum number of elements in every group; all
/// groups but the last hold exactly that many. It must be at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PartitionConfig {
    size: usize,
    threading: ThreadingPolicy,
}

impl PartitionConfig {
    /// Creates a new configuration with the given partition size.
    ///
    /// Returns [`PartitionError::InvalidPartitionSize`] if `size` is zero.
    pub fn new(size: usize) -> Result<Self, PartitionError> {
        if size == 0 {
            return Err(PartitionError::InvalidPartitionSize { size });
        }

        Ok(Self {
            size,
            threading: ThreadingPolicy::default(),
        })
    }

    /// Sets the partition size.
    ///
    /// The value is checked by [`validate`](Self::validate) and by every
    /// source constructor.
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Sets the threading policy used by `for_each_concurrent`.
    pub fn with_threading(mut self, threading: ThreadingPolicy) -> Self {
        self.threading = threading;
        self
    }

    /// Returns the partition size.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the threading policy.
    pub fn threading(&self) -> ThreadingPolicy {
        self.threading
    }

    /// Validates the current configuration.
    pub fn validate(&self) -> Result<(), PartitionError> {
        Self::new(self.size).map(|_| ())
    }
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_PARTITION_SIZE,
            threading: ThreadingPolicy::default(),
        }
    }
}
