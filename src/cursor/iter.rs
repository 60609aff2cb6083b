//! Traversal engine - PartitionIter.
//!
//! A [`PartitionIter`] produces successive partitions of up to `size`
//! elements from one of two backings:
//!
//! - a shared, random-access list, cut into zero-copy views by index
//! - a single-pass upstream cursor, pulled one element at a time
//!
//! The strategy is picked once when the traversal is created; `next` only
//! branches on it, never on the element type.
//!
//! # Example
//!
//! ```
//! use partitionrs::{PartitionConfig, PartitionSource};
//!
//! let mut source = PartitionSource::from_vec(vec![1, 2, 3, 4, 5], PartitionConfig::new(2)?)?;
//! let mut iter = source.traversal()?;
//!
//! while iter.has_more() {
//!     let partition = iter.next_partition()?;
//!     assert!(partition.len() <= 2);
//! }
//! # Ok::<(), partitionrs::PartitionError>(())
//! ```

use std::iter::{Fuse, FusedIterator, Peekable};
use std::sync::Arc;

use crate::error::PartitionError;
use crate::partition::Partition;

/// Upper bound on the capacity reserved up front for a pulled partition.
const MAX_PREALLOCATED: usize = 1024;

/// Single-pass element cursor feeding pull-backed traversals.
pub(crate) type Upstream<'a, T> =
    Box<dyn Iterator<Item = Result<T, PartitionError>> + Send + 'a>;

// Fused so an upstream that reports exhaustion is never pulled again.
type Pulled<'a, T> = Peekable<Fuse<Upstream<'a, T>>>;

enum Strategy<'a, T> {
    List { items: Arc<[T]>, position: usize },
    Pull { upstream: Pulled<'a, T>, offset: usize },
}

/// An iterator over the partitions of a source.
///
/// Yields `Result<Partition<T>, PartitionError>`; an `Err` can only come
/// from a fallible upstream cursor, after which the traversal is exhausted.
///
/// Besides the [`Iterator`] interface, [`has_more`](Self::has_more) and
/// [`next_partition`](Self::next_partition) give an explicit
/// "has more / produce next" protocol where asking past the end is an
/// error rather than `None`.
pub struct PartitionIter<'a, T> {
    strategy: Strategy<'a, T>,
    size: usize,
    produced: usize,
    finished: bool,
}

impl<'a, T> PartitionIter<'a, T> {
    /// Creates a traversal over a shared list, starting at position 0.
    pub(crate) fn over_list(items: Arc<[T]>, size: usize) -> Self {
        let finished = items.is_empty();
        Self {
            strategy: Strategy::List { items, position: 0 },
            size,
            produced: 0,
            finished,
        }
    }

    /// Creates a traversal draining `upstream`.
    pub(crate) fn over_cursor(upstream: Upstream<'a, T>, size: usize) -> Self {
        Self {
            strategy: Strategy::Pull {
                upstream: upstream.fuse().peekable(),
                offset: 0,
            },
            size,
            produced: 0,
            finished: false,
        }
    }

    /// Returns the partition size of this traversal.
    pub fn partition_size(&self) -> usize {
        self.size
    }

    /// Returns how many partitions have been produced so far.
    pub fn produced(&self) -> usize {
        self.produced
    }

    /// Returns true if another partition (or an upstream error) is pending.
    ///
    /// For pull-backed traversals this may block on the upstream cursor to
    /// look one element ahead. Once it returns false the traversal is
    /// exhausted for good.
    pub fn has_more(&mut self) -> bool {
        if self.finished {
            return false;
        }

        let more = match &mut self.strategy {
            Strategy::List { items, position } => *position < items.len(),
            Strategy::Pull { upstream, .. } => upstream.peek().is_some(),
        };
        if !more {
            self.finished = true;
        }
        more
    }

    /// Produces the next partition.
    ///
    /// Fails with [`PartitionError::NoSuchElement`] once the traversal is
    /// exhausted, and with [`PartitionError::UpstreamRead`] if the upstream
    /// cursor fails.
    pub fn next_partition(&mut self) -> Result<Partition<T>, PartitionError> {
        self.next().ok_or(PartitionError::NoSuchElement)?
    }

    fn next_from_list(
        items: &Arc<[T]>,
        position: &mut usize,
        size: usize,
        index: usize,
    ) -> Option<Partition<T>> {
        let start = *position;
        if start >= items.len() {
            return None;
        }

        let end = start.saturating_add(size).min(items.len());
        *position = end;
        Some(Partition::view(Arc::clone(items), start..end, index))
    }

    /// Pulls at least one element, then keeps pulling until the partition
    /// is full or the upstream runs dry.
    fn next_from_cursor(
        upstream: &mut Pulled<'a, T>,
        offset: &mut usize,
        size: usize,
        index: usize,
    ) -> Option<Result<Partition<T>, PartitionError>> {
        let first = match upstream.next()? {
            Ok(element) => element,
            Err(e) => return Some(Err(e)),
        };

        let mut group = Vec::with_capacity(size.min(MAX_PREALLOCATED));
        group.push(first);

        while group.len() < size {
            match upstream.next() {
                Some(Ok(element)) => group.push(element),
                // The partial group is dropped with the failure.
                Some(Err(e)) => return Some(Err(e)),
                None => break,
            }
        }

        let start = *offset;
        *offset += group.len();
        Some(Ok(Partition::owned(group, index, start)))
    }
}

impl<T> Iterator for PartitionIter<'_, T> {
    type Item = Result<Partition<T>, PartitionError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let index = self.produced;
        let result = match &mut self.strategy {
            Strategy::List { items, position } => {
                Self::next_from_list(items, position, self.size, index).map(Ok)
            }
            Strategy::Pull { upstream, offset } => {
                Self::next_from_cursor(upstream, offset, self.size, index)
            }
        };

        match &result {
            Some(Ok(partition)) => {
                self.produced += 1;
                log::trace!(
                    "produced partition #{} ({} elements @ {})",
                    index,
                    partition.len(),
                    partition.offset()
                );
            }
            Some(Err(e)) => {
                log::debug!("traversal stopped after {} partitions: {}", index, e);
                self.finished = true;
            }
            None => self.finished = true,
        }

        result
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.finished {
            return (0, Some(0));
        }

        match &self.strategy {
            Strategy::List { items, position } => {
                let remaining = (items.len() - position).div_ceil(self.size);
                (remaining, Some(remaining))
            }
            Strategy::Pull { upstream, .. } => {
                // A single upstream error can end the traversal early.
                let (lower, upper) = upstream.size_hint();
                (
                    usize::from(lower > 0),
                    upper.map(|upper| upper.div_ceil(self.size)),
                )
            }
        }
    }
}

impl<T> FusedIterator for PartitionIter<'_, T> {}
