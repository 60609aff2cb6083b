//! Shared ownership of an external byte resource.
//!
//! The source keeps a [`ResourceHandle`] and gives the conversion function a
//! [`ResourceReader`]. Both point at the same slot; only the handle can empty
//! it, and emptying it drops (closes) the resource.

use std::io::{self, Read};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type Slot<R> = Arc<Mutex<Option<R>>>;

fn lock<R>(slot: &Slot<R>) -> MutexGuard<'_, Option<R>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Something a source can release exactly once.
pub(crate) trait Release: Send {
    /// Releases the resource. Returns false if it was already released.
    fn release(&mut self) -> bool;
}

/// Owning side of a resource: releasing it closes the resource.
pub(crate) struct ResourceHandle<R> {
    slot: Slot<R>,
}

impl<R> ResourceHandle<R> {
    pub(crate) fn new(resource: R) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(resource))),
        }
    }

    /// Creates a reader over the same resource.
    pub(crate) fn reader(&self) -> ResourceReader<R> {
        ResourceReader {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<R: Send> Release for ResourceHandle<R> {
    fn release(&mut self) -> bool {
        let resource = lock(&self.slot).take();
        resource.is_some()
    }
}

/// Read-only view of a resource owned by a [`PartitionSource`].
///
/// Handed to the conversion function of
/// [`PartitionSource::from_resource`]. Reading after the source released the
/// resource fails with [`io::ErrorKind::BrokenPipe`].
///
/// [`PartitionSource`]: crate::PartitionSource
/// [`PartitionSource::from_resource`]: crate::PartitionSource::from_resource
pub struct ResourceReader<R> {
    slot: Slot<R>,
}

impl<R> ResourceReader<R> {
    /// Returns true while the owning source has not released the resource.
    pub fn is_open(&self) -> bool {
        lock(&self.slot).is_some()
    }
}

impl<R: Read> Read for ResourceReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut slot = lock(&self.slot);
        match slot.as_mut() {
            Some(resource) => resource.read(buf),
            None => Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "resource already released",
            )),
        }
    }
}

impl<R> std::fmt::Debug for ResourceReader<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceReader")
            .field("open", &self.is_open())
            .finish()
    }
}
