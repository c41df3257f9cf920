//! OwnedHeap - an indexable heap that owns its storage.

use crate::heap::{BoxedHeapStorage, IndexableHeap, Mode};
use crate::{Error, Key, Result};

/// An indexable heap that owns its storage.
///
/// This is a convenience wrapper around [`IndexableHeap`] +
/// [`BoxedHeapStorage`] sized to the heap's capacity.
///
/// # Example
///
/// ```
/// use nexus_median::{Error, Mode, OwnedHeap};
///
/// let mut heap: OwnedHeap<i64> = OwnedHeap::with_capacity(Mode::Max, 2).unwrap();
///
/// heap.add(5).unwrap();
/// heap.add(9).unwrap();
/// assert_eq!(heap.root(), Some(&9));
///
/// assert_eq!(heap.add(1), Err(Error::CapacityExceeded { capacity: 2 }));
/// ```
#[derive(Debug)]
pub struct OwnedHeap<T: Ord, K: Key = u32> {
    storage: BoxedHeapStorage<T, K>,
    heap: IndexableHeap<T, BoxedHeapStorage<T, K>, K>,
}

impl<T: Ord, K: Key> OwnedHeap<T, K> {
    /// Creates a heap holding at most `capacity` values.
    ///
    /// # Errors
    ///
    /// - [`Error::ZeroCapacity`] if `capacity` is 0
    /// - [`Error::CapacityOverflow`] if `K` cannot address `capacity` slots
    pub fn with_capacity(mode: Mode, capacity: usize) -> Result<Self> {
        let heap = IndexableHeap::with_capacity(mode, capacity)?;
        Ok(Self {
            storage: BoxedHeapStorage::with_capacity(capacity),
            heap,
        })
    }

    /// Returns the number of values in the heap.
    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns `true` if the heap is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Returns `true` if the heap is at capacity.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.heap.is_full()
    }

    /// Returns the fixed capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.heap.capacity()
    }

    /// Returns the heap's ordering.
    #[inline]
    pub fn mode(&self) -> Mode {
        self.heap.mode()
    }

    /// Inserts a value, returning its key.
    ///
    /// # Errors
    ///
    /// [`Error::CapacityExceeded`] if the heap is full.
    #[inline]
    pub fn add(&mut self, value: T) -> Result<K> {
        self.heap.add(&mut self.storage, value)
    }

    /// Replaces the value at `key`, restoring heap order.
    ///
    /// # Errors
    ///
    /// [`Error::ForeignNode`] if `key` is not in this heap.
    #[inline]
    pub fn update(&mut self, key: K, value: T) -> Result<()> {
        self.heap.update(&mut self.storage, key, value)
    }

    /// Returns the root value, or `None` if empty.
    #[inline]
    pub fn root(&self) -> Option<&T> {
        self.heap.root(&self.storage)
    }

    /// Returns the root's key, or `None` if empty.
    #[inline]
    pub fn root_key(&self) -> Option<K> {
        self.heap.root_key()
    }

    /// Returns the value at `key`.
    #[inline]
    pub fn get(&self, key: K) -> Option<&T> {
        self.heap.get(&self.storage, key)
    }

    /// Returns `true` if `key` is in the heap.
    #[inline]
    pub fn contains(&self, key: K) -> bool {
        self.heap.contains(&self.storage, key)
    }

    /// Returns the root value or [`Error::Empty`].
    ///
    /// Same as [`root`](Self::root) for callers that propagate errors.
    #[inline]
    pub fn try_root(&self) -> Result<&T> {
        self.root().ok_or(Error::Empty)
    }

    /// Removes every value.
    pub fn clear(&mut self) {
        self.heap.clear(&mut self.storage);
        self.storage.clear();
    }
}
