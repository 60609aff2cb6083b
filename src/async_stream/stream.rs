//! Async stream adapter for partitioning.
//!
//! Groups the items of any `futures_core::Stream` of `Result<T, E>` into
//! partitions, with the same rules as a pull-backed [`PartitionIter`]:
//! full partitions of `size` elements, a shorter last one, and an upstream
//! error that discards the partial partition and ends the stream.
//!
//! # Example
//!
//! ```ignore
//! use futures_util::{stream, StreamExt};
//! use partitionrs::{partition_stream, PartitionConfig};
//!
//! async fn demo() -> Result<(), partitionrs::PartitionError> {
//!     let upstream = stream::iter((1..=5).map(Ok::<_, std::io::Error>));
//!     let mut partitions = partition_stream(upstream, PartitionConfig::new(2)?)?;
//!
//!     while let Some(partition) = partitions.next().await {
//!         println!("{:?}", partition?);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! [`PartitionIter`]: crate::PartitionIter

use std::mem;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use pin_project_lite::pin_project;

use crate::config::PartitionConfig;
use crate::error::{BoxError, PartitionError};
use crate::partition::Partition;

pin_project! {
    /// A stream that yields partitions from an upstream stream.
    ///
    /// Runtime-agnostic: it only relies on `futures_core::Stream`, so it
    /// works with tokio, async-std, smol, or any futures-compatible runtime.
    /// Elements pulled before a `Pending` are kept until the partition fills.
    pub struct PartitionStream<S, T> {
        #[pin]
        upstream: S,
        size: usize,
        group: Vec<T>,
        produced: usize,
        offset: usize,
        finished: bool,
    }
}

impl<S, T> PartitionStream<S, T> {
    fn new(upstream: S, size: usize) -> Self {
        Self {
            upstream,
            size,
            group: Vec::new(),
            produced: 0,
            offset: 0,
            finished: false,
        }
    }
}

impl<S, T, E> Stream for PartitionStream<S, T>
where
    S: Stream<Item = Result<T, E>>,
    E: Into<BoxError>,
{
    type Item = Result<Partition<T>, PartitionError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        if *this.finished {
            return Poll::Ready(None);
        }

        loop {
            match this.upstream.as_mut().poll_next(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Some(Ok(element))) => {
                    this.group.push(element);
                    if this.group.len() >= *this.size {
                        break;
                    }
                }
                Poll::Ready(Some(Err(e))) => {
                    *this.finished = true;
                    this.group.clear();
                    let err = PartitionError::upstream(e);
                    log::debug!(
                        "partition stream stopped after {} partitions: {}",
                        this.produced,
                        err
                    );
                    return Poll::Ready(Some(Err(err)));
                }
                Poll::Ready(None) => {
                    *this.finished = true;
                    if this.group.is_empty() {
                        return Poll::Ready(None);
                    }
                    break;
                }
            }
        }

        let group = mem::take(this.group);
        let partition = Partition::owned(group, *this.produced, *this.offset);
        *this.produced += 1;
        *this.offset += partition.len();
        log::trace!(
            "produced partition #{} ({} elements @ {})",
            partition.index(),
            partition.len(),
            partition.offset()
        );
        Poll::Ready(Some(Ok(partition)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.finished {
            return (0, Some(0));
        }

        let buffered = self.group.len();
        let (lower, upper) = self.upstream.size_hint();
        // A single upstream error can end the stream early.
        (
            usize::from(lower.saturating_add(buffered) > 0),
            upper
                .and_then(|upper| upper.checked_add(buffered))
                .map(|n| n.div_ceil(self.size)),
        )
    }
}

/// Creates a partition stream from an upstream stream.
///
/// Fails with [`PartitionError::InvalidPartitionSize`] if the configured
/// size is zero.
///
/// # Arguments
///
/// * `upstream` - A stream of `Result<T, E>` elements
/// * `config` - The partitioning configuration
pub fn partition_stream<S, T, E>(
    upstream: S,
    config: PartitionConfig,
) -> Result<PartitionStream<S, T>, PartitionError>
where
    S: Stream<Item = Result<T, E>>,
    E: Into<BoxError>,
{
    config.validate()?;
    Ok(PartitionStream::new(upstream, config.size()))
}
