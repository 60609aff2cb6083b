//! Concurrent consumption of a partition source.
//!
//! Partition boundaries and the order inside each partition are fixed by the
//! sequential algorithm. Only the order in which whole partitions reach the
//! workers is left open.

use std::sync::Arc;

use rayon::iter::{Either, IntoParallelIterator, ParallelBridge, ParallelIterator};

use crate::config::ThreadingPolicy;
use crate::error::PartitionError;
use crate::partition::Partition;

use super::engine::{Backing, PartitionSource};

impl<'a, T> PartitionSource<'a, T>
where
    T: Send + Sync + 'a,
{
    /// Starts a traversal whose partitions may be processed in parallel.
    ///
    /// List-backed sources are split by partition index, so every worker
    /// cuts its own views. Pull-backed sources keep pulling on one thread at
    /// a time and bridge the produced partitions to the rayon workers; the
    /// same single-traversal rule as [`traversal`](Self::traversal) applies.
    ///
    /// # Example
    ///
    /// ```
    /// use rayon::iter::ParallelIterator;
    /// use partitionrs::{PartitionConfig, PartitionSource};
    ///
    /// let items: Vec<i32> = (1..=6).collect();
    /// let mut source = PartitionSource::from_vec(items, PartitionConfig::new(2)?)?;
    /// let sums: Vec<i32> = source
    ///     .par_traversal()?
    ///     .map(|p| p.map(|p| p.iter().sum()))
    ///     .collect::<Result<_, _>>()?;
    ///
    /// assert_eq!(sums.iter().sum::<i32>(), 21);
    /// # Ok::<(), partitionrs::PartitionError>(())
    /// ```
    pub fn par_traversal(
        &mut self,
    ) -> Result<
        impl ParallelIterator<Item = Result<Partition<T>, PartitionError>> + use<'a, T>,
        PartitionError,
    > {
        let size = self.config().size();

        if let Backing::List(items) = &self.backing {
            let items = Arc::clone(items);
            let count = items.len().div_ceil(size);
            log::debug!("parallel traversal over {} list partitions", count);

            let partitions = (0..count).into_par_iter().map(move |index| {
                let start = index * size;
                let end = start.saturating_add(size).min(items.len());
                Ok::<_, PartitionError>(Partition::view(Arc::clone(&items), start..end, index))
            });
            return Ok(Either::Left(partitions));
        }

        Ok(Either::Right(self.traversal()?.par_bridge()))
    }

    /// Calls `op` on every partition under the configured
    /// [`ThreadingPolicy`].
    ///
    /// Returns the first upstream error; partitions already handed to
    /// workers still finish.
    pub fn for_each_concurrent<F>(&mut self, op: F) -> Result<(), PartitionError>
    where
        F: Fn(Partition<T>) + Send + Sync,
    {
        let policy = self.config().threading();

        if policy == ThreadingPolicy::Single {
            for partition in self.traversal()? {
                op(partition?);
            }
            return Ok(());
        }

        let pool = policy.build_pool()?;
        let partitions = self.par_traversal()?;
        match pool {
            Some(pool) => pool.install(|| partitions.try_for_each(|p| p.map(&op))),
            None => partitions.try_for_each(|p| p.map(&op)),
        }
    }
}
