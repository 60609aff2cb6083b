//! Worker placement for concurrently processed partitions.

use rayon::ThreadPool;

use crate::error::PartitionError;

/// Where `for_each_concurrent` runs its per-partition work.
///
/// Production of partitions is always single-threaded; the policy only
/// decides how the produced groups fan out.
#[derive(Debug, Copy, Clone, Default, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub enum ThreadingPolicy {
    /// Process every group on the calling thread, in production order.
    Single,
    /// Use a dedicated pool with this many threads (at least one).
    Fixed(usize),
    /// Use rayon's global pool.
    #[default]
    Global,
}

impl ThreadingPolicy {
    /// Returns the number of worker threads this policy uses.
    pub fn threads_count(&self) -> usize {
        match self {
            ThreadingPolicy::Single => 1,
            ThreadingPolicy::Fixed(thread_count) => (*thread_count).max(1),
            ThreadingPolicy::Global => rayon::current_num_threads(),
        }
    }

    /// Builds the dedicated pool for [`ThreadingPolicy::Fixed`].
    ///
    /// The other policies need no pool of their own and return `None`.
    pub(crate) fn build_pool(&self) -> Result<Option<ThreadPool>, PartitionError> {
        match self {
            ThreadingPolicy::Fixed(_) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(self.threads_count())
                    .build()?;
                Ok(Some(pool))
            }
            ThreadingPolicy::Single | ThreadingPolicy::Global => Ok(None),
        }
    }
}
