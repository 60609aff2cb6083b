//! Error types for partitionrs.

use std::error::Error;
use std::fmt;

/// Boxed error raised by a caller-supplied converter or upstream cursor.
pub type BoxError = Box<dyn Error + Send + Sync>;

/// Errors that can occur while building or traversing partitions.
#[derive(Debug)]
pub enum PartitionError {
    /// The partition size was less than 1.
    InvalidPartitionSize {
        /// The rejected size.
        size: usize,
    },

    /// The conversion function failed to turn a resource into a cursor.
    ResourceConversion(BoxError),

    /// The upstream cursor failed while producing the next element.
    UpstreamRead(BoxError),

    /// A partition was requested after the traversal was exhausted.
    NoSuchElement,

    /// A single-pass source was asked for a second traversal.
    TraversalConsumed,

    /// The dedicated worker pool could not be built.
    ThreadPool(rayon::ThreadPoolBuildError),
}

impl PartitionError {
    pub(crate) fn upstream(err: impl Into<BoxError>) -> Self {
        PartitionError::UpstreamRead(err.into())
    }
}

impl fmt::Display for PartitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartitionError::InvalidPartitionSize { size } => {
                write!(f, "invalid partition size: {} (must be at least 1)", size)
            }
            PartitionError::ResourceConversion(e) => {
                write!(f, "resource conversion failed: {}", e)
            }
            PartitionError::UpstreamRead(e) => write!(f, "upstream read failed: {}", e),
            PartitionError::NoSuchElement => write!(f, "no more partitions"),
            PartitionError::TraversalConsumed => {
                write!(f, "single-pass source has already been traversed")
            }
            PartitionError::ThreadPool(e) => write!(f, "thread pool error: {}", e),
        }
    }
}

impl Error for PartitionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PartitionError::ResourceConversion(e) | PartitionError::UpstreamRead(e) => {
                Some(e.as_ref())
            }
            PartitionError::ThreadPool(e) => Some(e),
            _ => None,
        }
    }
}

impl From<rayon::ThreadPoolBuildError> for PartitionError {
    fn from(e: rayon::ThreadPoolBuildError) -> Self {
        PartitionError::ThreadPool(e)
    }
}
