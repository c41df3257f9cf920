//! Storage trait for slab-like containers with stable keys.
//!
//! Storage provides insert/remove/get operations where keys remain valid
//! until explicitly removed. Heaps hold keys into storage instead of owning
//! their nodes, which lets a node move between two heaps that share one
//! storage without its key changing.

use std::marker::PhantomData;

use crate::Key;

/// Slab-like storage with stable keys.
///
/// # Requirements
///
/// Implementations must provide:
/// - **Stable keys**: a key remains valid until explicitly removed
/// - **O(1)** insert, remove, get operations
/// - **Slot reuse**: removed slots can be reused by future inserts
///
/// # Implementations
///
/// - [`BoxedStorage<T>`] - fixed capacity, allocated once (in this crate)
/// - `slab::Slab<T>` - growable (feature `slab`)
pub trait Storage<T> {
    /// Key type for this storage.
    type Key: Key;

    /// Error type for failed insertions.
    ///
    /// - [`Full<T>`] for fixed-capacity storage
    /// - `Infallible` for growable storage
    type Error;

    /// Inserts a value, returning its stable key.
    fn try_insert(&mut self, value: T) -> Result<Self::Key, Self::Error>;

    /// Removes and returns the value at `key`, if present.
    fn remove(&mut self, key: Self::Key) -> Option<T>;

    /// Returns a reference to the value at `key`, if present.
    fn get(&self, key: Self::Key) -> Option<&T>;

    /// Returns a mutable reference to the value at `key`, if present.
    fn get_mut(&mut self, key: Self::Key) -> Option<&mut T>;

    /// Returns the number of occupied slots.
    fn len(&self) -> usize;

    /// Returns `true` if no slots are occupied.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Error returned when fixed-capacity storage is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Full<T>(pub T);

impl<T> Full<T> {
    /// Returns the value that could not be inserted.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> core::fmt::Display for Full<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "storage is full")
    }
}

impl<T: core::fmt::Debug> std::error::Error for Full<T> {}

// =============================================================================
// BoxedStorage - runtime capacity, single allocation, free stack
// =============================================================================

/// Fixed-capacity storage with runtime-determined size.
///
/// All slots and the free stack are allocated up front; inserts and removes
/// never allocate. Freed slots are reused LIFO.
///
/// # Example
///
/// ```
/// use nexus_median::{BoxedStorage, Storage};
///
/// let mut storage: BoxedStorage<u64> = BoxedStorage::with_capacity(3);
/// assert_eq!(storage.capacity(), 3);
///
/// let key = storage.try_insert(42).unwrap();
/// assert_eq!(storage.get(key), Some(&42));
/// ```
pub struct BoxedStorage<T, K: Key = u32> {
    entries: Box<[Option<T>]>,
    /// Vacant keys; the top of the stack is handed out next.
    free: Box<[K]>,
    free_len: usize,
    _marker: PhantomData<K>,
}

impl<T, K: Key> BoxedStorage<T, K> {
    /// Creates storage with exactly `capacity` slots.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0 or exceeds the key type's range.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be > 0");
        assert!(
            capacity <= K::max_capacity(),
            "capacity exceeds key type maximum"
        );

        let entries = (0..capacity).map(|_| None).collect();
        // Reversed so the first insert hands out key 0.
        let free = (0..capacity).rev().map(K::from_usize).collect();

        Self {
            entries,
            free,
            free_len: capacity,
            _marker: PhantomData,
        }
    }

    /// Returns the capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if all slots are occupied.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.free_len == 0
    }

    /// Removes all elements from storage.
    ///
    /// Any heap still holding keys into this storage is left dangling; clear
    /// those first (the owned wrappers do this for you).
    pub fn clear(&mut self) {
        for entry in self.entries.iter_mut() {
            *entry = None;
        }
        let capacity = self.entries.len();
        for (slot, key) in self.free.iter_mut().zip((0..capacity).rev()) {
            *slot = K::from_usize(key);
        }
        self.free_len = capacity;
    }
}

impl<T, K: Key> Storage<T> for BoxedStorage<T, K> {
    type Key = K;
    type Error = Full<T>;

    #[inline]
    fn try_insert(&mut self, value: T) -> Result<K, Full<T>> {
        if self.free_len == 0 {
            return Err(Full(value));
        }

        self.free_len -= 1;
        let key = self.free[self.free_len];
        self.entries[key.as_usize()] = Some(value);
        Ok(key)
    }

    #[inline]
    fn remove(&mut self, key: K) -> Option<T> {
        let value = self.entries.get_mut(key.as_usize())?.take()?;
        self.free[self.free_len] = key;
        self.free_len += 1;
        Some(value)
    }

    #[inline]
    fn get(&self, key: K) -> Option<&T> {
        self.entries.get(key.as_usize())?.as_ref()
    }

    #[inline]
    fn get_mut(&mut self, key: K) -> Option<&mut T> {
        self.entries.get_mut(key.as_usize())?.as_mut()
    }

    #[inline]
    fn len(&self) -> usize {
        self.entries.len() - self.free_len
    }
}

impl<T, K: Key> core::fmt::Debug for BoxedStorage<T, K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BoxedStorage")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}

// =============================================================================
// slab::Slab implementation
// =============================================================================

#[cfg(feature = "slab")]
impl<T> Storage<T> for slab::Slab<T> {
    type Key = usize;
    type Error = core::convert::Infallible;

    #[inline]
    fn try_insert(&mut self, value: T) -> Result<usize, Self::Error> {
        Ok(self.insert(value))
    }

    #[inline]
    fn remove(&mut self, key: usize) -> Option<T> {
        self.try_remove(key)
    }

    #[inline]
    fn get(&self, key: usize) -> Option<&T> {
        slab::Slab::get(self, key)
    }

    #[inline]
    fn get_mut(&mut self, key: usize) -> Option<&mut T> {
        slab::Slab::get_mut(self, key)
    }

    #[inline]
    fn len(&self) -> usize {
        slab::Slab::len(self)
    }
}
