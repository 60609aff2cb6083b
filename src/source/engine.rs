//! Partition source - normalizes every supported input into one of two
//! traversal-ready backings.
//!
//! - list-backed: an immutable `Arc<[T]>`, traversable any number of times
//! - pull-backed: a single-pass cursor, traversable exactly once
//!
//! # Example
//!
//! ```
//! use partitionrs::{PartitionConfig, PartitionSource};
//!
//! let config = PartitionConfig::new(3)?;
//! let mut source = PartitionSource::from_vec(vec![1, 2, 3, 4, 5, 6, 7], config)?;
//!
//! let groups: Vec<Vec<i32>> = source
//!     .traversal()?
//!     .map(|p| p.map(|p| p.into_vec()))
//!     .collect::<Result<_, _>>()?;
//!
//! assert_eq!(groups, vec![vec![1, 2, 3], vec![4, 5, 6], vec![7]]);
//! # Ok::<(), partitionrs::PartitionError>(())
//! ```

use std::fmt;
use std::io::Read;
use std::sync::Arc;

use crate::config::PartitionConfig;
use crate::cursor::{PartitionIter, Upstream};
use crate::error::{BoxError, PartitionError};

use super::resource::{Release, ResourceHandle, ResourceReader};

pub(super) enum Backing<'a, T> {
    List(Arc<[T]>),
    // `None` once the single traversal has been handed out.
    Pull(Option<Upstream<'a, T>>),
}

/// A source of fixed-size partitions.
///
/// Built from an array, a vector or slice, any collection, a pull cursor,
/// or a byte resource plus a conversion function. List-backed sources hand
/// out independent traversals that each start from the beginning;
/// pull-backed sources hand out a single traversal and then fail with
/// [`PartitionError::TraversalConsumed`].
///
/// A source built with [`from_resource`](Self::from_resource) owns the
/// resource. It is closed by [`release`](Self::release), by
/// [`scoped`](Self::scoped), or at the latest when the source is dropped.
pub struct PartitionSource<'a, T> {
    config: PartitionConfig,
    pub(super) backing: Backing<'a, T>,
    resource: Option<Box<dyn Release + 'a>>,
}

impl<'a, T: 'a> PartitionSource<'a, T> {
    fn list(items: Arc<[T]>, config: PartitionConfig) -> Result<Self, PartitionError> {
        config.validate()?;
        log::debug!(
            "list-backed partition source: {} elements, partition size {}",
            items.len(),
            config.size()
        );

        Ok(Self {
            config,
            backing: Backing::List(items),
            resource: None,
        })
    }

    fn pull(upstream: Upstream<'a, T>, config: PartitionConfig) -> Result<Self, PartitionError> {
        config.validate()?;
        log::debug!(
            "pull-backed partition source: partition size {}",
            config.size()
        );

        Ok(Self {
            config,
            backing: Backing::Pull(Some(upstream)),
            resource: None,
        })
    }

    /// Creates a list-backed source from a fixed array.
    pub fn from_array<const N: usize>(
        items: [T; N],
        config: PartitionConfig,
    ) -> Result<Self, PartitionError> {
        Self::list(Arc::from(items), config)
    }

    /// Creates a list-backed source from a vector.
    pub fn from_vec(items: Vec<T>, config: PartitionConfig) -> Result<Self, PartitionError> {
        Self::list(Arc::from(items), config)
    }

    /// Creates a list-backed source holding a copy of `items`.
    pub fn from_slice(items: &[T], config: PartitionConfig) -> Result<Self, PartitionError>
    where
        T: Clone,
    {
        Self::list(Arc::from(items), config)
    }

    /// Creates a list-backed source over already shared storage, without
    /// copying it.
    pub fn from_shared(items: Arc<[T]>, config: PartitionConfig) -> Result<Self, PartitionError> {
        Self::list(items, config)
    }

    /// Creates a list-backed source by draining `items` once, eagerly.
    ///
    /// Use [`from_cursor`](Self::from_cursor) instead for unbounded inputs.
    pub fn from_collection<I>(items: I, config: PartitionConfig) -> Result<Self, PartitionError>
    where
        I: IntoIterator<Item = T>,
    {
        config.validate()?;
        Self::list(items.into_iter().collect(), config)
    }

    /// Creates a single-pass source pulling from `cursor` on demand.
    pub fn from_cursor<I>(cursor: I, config: PartitionConfig) -> Result<Self, PartitionError>
    where
        I: Iterator<Item = T> + Send + 'a,
    {
        Self::pull(Box::new(cursor.map(Ok)), config)
    }

    /// Creates a single-pass source over a cursor whose pulls may fail.
    ///
    /// An `Err` element surfaces as [`PartitionError::UpstreamRead`] and ends
    /// the traversal.
    pub fn from_fallible_cursor<I, E>(
        cursor: I,
        config: PartitionConfig,
    ) -> Result<Self, PartitionError>
    where
        I: Iterator<Item = Result<T, E>> + Send + 'a,
        E: Into<BoxError>,
    {
        Self::pull(
            Box::new(cursor.map(|element| element.map_err(PartitionError::upstream))),
            config,
        )
    }

    /// Creates a single-pass source over records parsed from a resource.
    ///
    /// `convert` is called once with a [`ResourceReader`] over `resource` and
    /// returns the element cursor. It must not try to close the resource;
    /// the source owns it and closes it on release.
    ///
    /// A conversion failure is returned as
    /// [`PartitionError::ResourceConversion`], after the resource has been
    /// closed.
    ///
    /// # Example
    ///
    /// ```
    /// use std::io::{BufReader, Cursor};
    /// use partitionrs::{decode, PartitionConfig, PartitionSource};
    ///
    /// let input = Cursor::new(b"a\nb\nc\n".to_vec());
    /// let source = PartitionSource::from_resource(input, PartitionConfig::new(2)?, |reader| {
    ///     Ok::<_, std::io::Error>(decode::delimited(BufReader::new(reader), b'\n'))
    /// })?;
    ///
    /// let count = source.scoped(|source| -> Result<usize, partitionrs::PartitionError> {
    ///     Ok(source.traversal()?.count())
    /// })?;
    /// assert_eq!(count, 2);
    /// # Ok::<(), partitionrs::PartitionError>(())
    /// ```
    pub fn from_resource<R, F, I, E, U>(
        resource: R,
        config: PartitionConfig,
        convert: F,
    ) -> Result<Self, PartitionError>
    where
        R: Read + Send + 'a,
        F: FnOnce(ResourceReader<R>) -> Result<I, E>,
        E: Into<BoxError>,
        I: Iterator<Item = Result<T, U>> + Send + 'a,
        U: Into<BoxError>,
    {
        config.validate()?;

        let handle = ResourceHandle::new(resource);
        let cursor = match convert(handle.reader()) {
            Ok(cursor) => cursor,
            Err(e) => {
                let err = PartitionError::ResourceConversion(e.into());
                log::debug!("closing resource after failed conversion: {}", err);
                return Err(err);
            }
        };

        let mut source = Self::from_fallible_cursor(cursor, config)?;
        source.resource = Some(Box::new(handle));
        Ok(source)
    }

    /// Returns the configuration.
    pub fn config(&self) -> &PartitionConfig {
        &self.config
    }

    /// Returns true if the source can only be traversed once.
    pub fn is_single_pass(&self) -> bool {
        matches!(self.backing, Backing::Pull(_))
    }

    /// Returns true if the source still holds an unreleased resource.
    pub fn has_resource(&self) -> bool {
        self.resource.is_some()
    }

    /// Returns the number of partitions a traversal produces, if known.
    ///
    /// This is `ceil(len / size)` for list-backed sources and `None` for
    /// pull-backed ones.
    pub fn partition_count(&self) -> Option<usize> {
        match &self.backing {
            Backing::List(items) => Some(items.len().div_ceil(self.config.size())),
            Backing::Pull(_) => None,
        }
    }

    /// Starts a traversal.
    ///
    /// List-backed sources return a fresh, independent traversal from
    /// position 0 on every call. Pull-backed sources return their only
    /// traversal on the first call and [`PartitionError::TraversalConsumed`]
    /// afterwards.
    pub fn traversal(&mut self) -> Result<PartitionIter<'a, T>, PartitionError> {
        let size = self.config.size();
        match &mut self.backing {
            Backing::List(items) => Ok(PartitionIter::over_list(Arc::clone(items), size)),
            Backing::Pull(upstream) => {
                let upstream = upstream.take().ok_or(PartitionError::TraversalConsumed)?;
                log::debug!("handing out single-pass traversal");
                Ok(PartitionIter::over_cursor(upstream, size))
            }
        }
    }

    /// Runs `body` with the source, then releases the resource.
    ///
    /// The release happens on every exit path of `body` that returns,
    /// including an `Err` result; unwinding releases it through `Drop`.
    pub fn scoped<F, O>(mut self, body: F) -> O
    where
        F: FnOnce(&mut Self) -> O,
    {
        let out = body(&mut self);
        self.release();
        out
    }
}

impl<T> PartitionSource<'_, T> {
    /// Closes the owned resource, if any.
    ///
    /// Returns true if a resource was closed by this call. Calling it again,
    /// or on a source without a resource, is a no-op returning false.
    pub fn release(&mut self) -> bool {
        let Some(mut resource) = self.resource.take() else {
            return false;
        };

        let released = resource.release();
        if released {
            log::debug!("released partition source resource");
        }
        released
    }
}

impl<T> Drop for PartitionSource<'_, T> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<T> fmt::Debug for PartitionSource<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let backing = match &self.backing {
            Backing::List(items) => format!("List({} elements)", items.len()),
            Backing::Pull(Some(_)) => "Pull".to_string(),
            Backing::Pull(None) => "Pull(consumed)".to_string(),
        };

        f.debug_struct("PartitionSource")
            .field("config", &self.config)
            .field("backing", &backing)
            .field("has_resource", &self.has_resource())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn config(size: usize) -> PartitionConfig {
        PartitionConfig::new(size).unwrap()
    }

    fn groups<'a, T: Clone + 'a>(source: &mut PartitionSource<'a, T>) -> Vec<Vec<T>> {
        source
            .traversal()
            .unwrap()
            .map(|p| p.unwrap().into_vec())
            .collect()
    }

    struct Tracked {
        inner: Cursor<Vec<u8>>,
        closed: Arc<AtomicUsize>,
    }

    impl Read for Tracked {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.inner.read(buf)
        }
    }

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.closed.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn tracked(data: Vec<u8>) -> (Tracked, Arc<AtomicUsize>) {
        let closed = Arc::new(AtomicUsize::new(0));
        let resource = Tracked {
            inner: Cursor::new(data),
            closed: Arc::clone(&closed),
        };
        (resource, closed)
    }

    #[test]
    fn test_from_array() {
        let mut source = PartitionSource::from_array([1, 2, 3, 4, 5], config(2)).unwrap();
        assert_eq!(groups(&mut source), vec![vec![1, 2], vec![3, 4], vec![5]]);
        assert!(!source.is_single_pass());
    }

    #[test]
    fn test_from_slice_and_shared() {
        let data = [1, 2, 3];
        let mut copied = PartitionSource::from_slice(&data[..], config(2)).unwrap();
        assert_eq!(groups(&mut copied), vec![vec![1, 2], vec![3]]);

        let shared: Arc<[i32]> = Arc::from(vec![4, 5, 6]);
        let mut wrapped = PartitionSource::from_shared(Arc::clone(&shared), config(2)).unwrap();
        assert_eq!(groups(&mut wrapped), vec![vec![4, 5], vec![6]]);
        assert_eq!(Arc::strong_count(&shared), 2);
    }

    #[test]
    fn test_from_collection_is_list_backed() {
        let set: std::collections::BTreeSet<u32> = [5, 1, 3].into_iter().collect();
        let mut source = PartitionSource::from_collection(set, config(2)).unwrap();

        assert!(!source.is_single_pass());
        assert_eq!(source.partition_count(), Some(2));
        assert_eq!(groups(&mut source), vec![vec![1, 3], vec![5]]);
        assert_eq!(groups(&mut source), vec![vec![1, 3], vec![5]]);
    }

    #[test]
    fn test_invalid_size_rejected_by_every_constructor() {
        let zero = PartitionConfig::default().with_size(0);
        assert!(PartitionSource::from_vec(vec![1], zero).is_err());
        assert!(PartitionSource::from_collection(vec![1], zero).is_err());
        assert!(PartitionSource::from_cursor(0..3, zero).is_err());

        let (resource, closed) = tracked(vec![1]);
        let result = PartitionSource::from_resource(resource, zero, |reader| {
            Ok::<_, io::Error>(reader.bytes())
        });
        assert!(matches!(
            result,
            Err(PartitionError::InvalidPartitionSize { size: 0 })
        ));
        assert_eq!(closed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cursor_single_traversal() {
        let mut source = PartitionSource::from_cursor(1..=5, config(2)).unwrap();
        assert!(source.is_single_pass());
        assert_eq!(source.partition_count(), None);

        assert_eq!(groups(&mut source), vec![vec![1, 2], vec![3, 4], vec![5]]);
        assert!(matches!(
            source.traversal(),
            Err(PartitionError::TraversalConsumed)
        ));
    }

    #[test]
    fn test_resource_released_once() {
        let (resource, closed) = tracked(vec![1, 2, 3, 4]);
        let mut source = PartitionSource::from_resource(resource, config(2), |reader| {
            Ok::<_, io::Error>(reader.bytes())
        })
        .unwrap();

        assert!(source.has_resource());
        assert_eq!(groups(&mut source), vec![vec![1, 2], vec![3, 4]]);
        assert_eq!(closed.load(Ordering::SeqCst), 0);

        assert!(source.release());
        assert_eq!(closed.load(Ordering::SeqCst), 1);
        assert!(!source.release());
        drop(source);
        assert_eq!(closed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_releases_resource() {
        let (resource, closed) = tracked(vec![1, 2, 3]);
        let source = PartitionSource::from_resource(resource, config(2), |reader| {
            Ok::<_, io::Error>(reader.bytes())
        })
        .unwrap();

        drop(source);
        assert_eq!(closed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_release_without_resource_is_noop() {
        let mut source = PartitionSource::from_vec(vec![1, 2], config(1)).unwrap();
        assert!(!source.has_resource());
        assert!(!source.release());
        assert_eq!(groups(&mut source), vec![vec![1], vec![2]]);
    }

    #[test]
    fn test_conversion_failure_closes_resource() {
        let (resource, closed) = tracked(vec![1, 2, 3]);
        let result = PartitionSource::<u8>::from_resource(resource, config(2), |_reader| {
            Err::<std::iter::Empty<Result<u8, io::Error>>, _>(io::Error::new(
                io::ErrorKind::InvalidData,
                "bad header",
            ))
        });

        let err = result.unwrap_err();
        assert!(matches!(err, PartitionError::ResourceConversion(_)));
        assert!(err.to_string().contains("bad header"));
        assert_eq!(closed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_traversal_after_release_reports_upstream_error() {
        let (resource, _closed) = tracked(vec![1, 2, 3]);
        let mut source = PartitionSource::from_resource(resource, config(2), |reader| {
            Ok::<_, io::Error>(reader.bytes())
        })
        .unwrap();

        source.release();
        let mut iter = source.traversal().unwrap();
        assert!(matches!(iter.next(), Some(Err(PartitionError::UpstreamRead(_)))));
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_scoped_releases_on_error_exit() {
        let (resource, closed) = tracked(vec![1, 2, 3]);
        let source = PartitionSource::from_resource(resource, config(2), |reader| {
            Ok::<_, io::Error>(reader.bytes())
        })
        .unwrap();

        let result: Result<(), PartitionError> = source.scoped(|source| {
            let mut iter = source.traversal()?;
            iter.next_partition()?;
            Err(PartitionError::NoSuchElement)
        });

        assert!(result.is_err());
        assert_eq!(closed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_debug() {
        let mut source = PartitionSource::from_cursor(0..3, config(2)).unwrap();
        assert!(format!("{:?}", source).contains("Pull"));
        let _ = source.traversal().unwrap();
        assert!(format!("{:?}", source).contains("Pull(consumed)"));
    }
}
