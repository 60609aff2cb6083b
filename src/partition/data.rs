//! The Partition type - one ordered group of source elements.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Deref, Range};
use std::sync::Arc;

/// One ordered group of at most `size` consecutive source elements.
///
/// A partition is read-only. Groups cut from a list-backed source share the
/// source's storage; groups pulled from a cursor own their elements. Both
/// dereference to `[T]`.
///
/// # Example
///
/// ```
/// use partitionrs::Partition;
///
/// let partition = Partition::from(vec![1, 2, 3]);
///
/// assert_eq!(partition.len(), 3);
/// assert_eq!(partition, [1, 2, 3]);
/// ```
#[derive(Clone)]
pub struct Partition<T> {
    repr: Repr<T>,
    index: usize,
    offset: usize,
}

#[derive(Clone)]
enum Repr<T> {
    View { items: Arc<[T]>, range: Range<usize> },
    Owned(Box<[T]>),
}

impl<T> Partition<T> {
    /// Creates a view of `items[range]` without copying.
    pub(crate) fn view(items: Arc<[T]>, range: Range<usize>, index: usize) -> Self {
        debug_assert!(range.start < range.end && range.end <= items.len());
        let offset = range.start;
        Self {
            repr: Repr::View { items, range },
            index,
            offset,
        }
    }

    /// Creates a partition owning `items`.
    pub(crate) fn owned(items: Vec<T>, index: usize, offset: usize) -> Self {
        Self {
            repr: Repr::Owned(items.into_boxed_slice()),
            index,
            offset,
        }
    }

    /// Returns the position of this partition in production order (0-based).
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the source position of this partition's first element.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the source positions covered by this partition.
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.len()
    }

    /// Returns the elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        match &self.repr {
            Repr::View { items, range } => &items[range.clone()],
            Repr::Owned(items) => items,
        }
    }

    /// Consumes the partition and returns its elements.
    ///
    /// Owned partitions hand over their buffer; views copy out of the
    /// shared storage.
    pub fn into_vec(self) -> Vec<T>
    where
        T: Clone,
    {
        match self.repr {
            Repr::View { items, range } => items[range].to_vec(),
            Repr::Owned(items) => items.into_vec(),
        }
    }
}

impl<T> Deref for Partition<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> AsRef<[T]> for Partition<T> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> From<Vec<T>> for Partition<T> {
    fn from(items: Vec<T>) -> Self {
        Self::owned(items, 0, 0)
    }
}

impl<'p, T> IntoIterator for &'p Partition<T> {
    type Item = &'p T;
    type IntoIter = std::slice::Iter<'p, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for Partition<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T> fmt::Display for Partition<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Partition(#{}, {} elements @ {})",
            self.index,
            self.len(),
            self.offset
        )
    }
}

// Equality and hashing only look at the elements.
impl<T: PartialEq<U>, U> PartialEq<Partition<U>> for Partition<T> {
    fn eq(&self, other: &Partition<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for Partition<T> {}

impl<T: PartialEq<U>, U> PartialEq<[U]> for Partition<T> {
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T: PartialEq<U>, U, const N: usize> PartialEq<[U; N]> for Partition<T> {
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == other
    }
}

impl<T: PartialEq<U>, U> PartialEq<Vec<U>> for Partition<T> {
    fn eq(&self, other: &Vec<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Hash> Hash for Partition<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_shares_storage() {
        let items: Arc<[u32]> = Arc::from(vec![10, 20, 30, 40, 50]);
        let partition = Partition::view(Arc::clone(&items), 1..4, 0);

        assert_eq!(partition, [20, 30, 40]);
        assert_eq!(Arc::strong_count(&items), 2);
    }

    #[test]
    fn test_owned() {
        let partition = Partition::owned(vec!['a', 'b'], 3, 6);
        assert_eq!(partition.len(), 2);
        assert_eq!(partition.index(), 3);
        assert_eq!(partition.offset(), 6);
        assert_eq!(partition.range(), 6..8);
    }

    #[test]
    fn test_view_and_owned_compare_equal() {
        let items: Arc<[u32]> = Arc::from(vec![1, 2, 3, 4]);
        let view = Partition::view(items, 2..4, 1);
        let owned = Partition::from(vec![3, 4]);
        assert_eq!(view, owned);
    }

    #[test]
    fn test_into_vec() {
        let items: Arc<[String]> = Arc::from(vec!["x".to_string(), "y".to_string()]);
        let view = Partition::view(items, 1..2, 1);
        assert_eq!(view.into_vec(), vec!["y".to_string()]);

        let owned = Partition::from(vec![7u8, 8]);
        assert_eq!(owned.into_vec(), vec![7, 8]);
    }

    #[test]
    fn test_iterate_by_ref() {
        let partition = Partition::from(vec![1, 2, 3]);
        let sum: i32 = (&partition).into_iter().sum();
        assert_eq!(sum, 6);
    }

    #[test]
    fn test_debug_and_display() {
        let items: Arc<[u8]> = Arc::from(vec![1, 2, 3, 4, 5]);
        let partition = Partition::view(items, 3..5, 1);
        assert_eq!(format!("{:?}", partition), "[4, 5]");
        assert_eq!(
            format!("{}", partition),
            "Partition(#1, 2 elements @ 3)"
        );
    }
}
