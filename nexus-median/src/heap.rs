//! Indexable binary heap over external storage.
//!
//! Nodes live in a [`Storage`]; the heap keeps their keys in a preallocated
//! slot array. Each node embeds its current slot and the [`HeapId`] of the
//! heap holding it, which gives:
//!
//! - O(log n) in-place value replacement by key ([`IndexableHeap::update`])
//! - O(log n) exchange of roots between two heaps sharing one storage
//!   ([`IndexableHeap::swap_root_with`])
//! - stable keys: a node keeps its key across every reslotting and across
//!   moves between heaps
//!
//! Slot addressing is the usual complete binary tree: children of `i` are
//! `2i + 1` and `2i + 2`, the parent of `i` is `(i - 1) / 2`.
//!
//! # Storage Invariant
//!
//! A heap must always be used with the same storage instance. Heaps that
//! exchange roots must share that storage.
//!
//! # Example
//!
//! ```
//! use nexus_median::{BoxedHeapStorage, IndexableHeap, Mode};
//!
//! let mut storage: BoxedHeapStorage<u32> = BoxedHeapStorage::with_capacity(8);
//! let mut heap = IndexableHeap::with_capacity(Mode::Max, 8).unwrap();
//!
//! heap.add(&mut storage, 3).unwrap();
//! let key = heap.add(&mut storage, 5).unwrap();
//! heap.add(&mut storage, 4).unwrap();
//! assert_eq!(heap.root(&storage), Some(&5));
//!
//! // Replace in place; the key stays valid
//! heap.update(&mut storage, key, 1).unwrap();
//! assert_eq!(heap.root(&storage), Some(&4));
//! assert_eq!(heap.get(&storage, key), Some(&1));
//! ```

use std::marker::PhantomData;

use crate::{BoxedStorage, Error, HeapId, Key, Result, Storage};

/// Type alias for heap storage backed by a fixed boxed allocation.
pub type BoxedHeapStorage<T, K = u32> = BoxedStorage<HeapNode<T, K>, K>;

/// Type alias for heap storage backed by `slab::Slab`.
#[cfg(feature = "slab")]
pub type SlabHeapStorage<T> = slab::Slab<HeapNode<T, usize>>;

/// Ordering of an [`IndexableHeap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Smallest value at the root.
    Min,
    /// Largest value at the root.
    Max,
}

impl Mode {
    /// Returns `true` if `a` belongs strictly closer to the root than `b`.
    #[inline]
    fn outranks<T: Ord>(self, a: &T, b: &T) -> bool {
        match self {
            Self::Min => a < b,
            Self::Max => a > b,
        }
    }
}

/// A value cell tracked by an [`IndexableHeap`].
///
/// Wraps the user value with the node's slot in its owning heap and the
/// owner's id. Users reach values through the heap accessors; the bookkeeping
/// fields are read-only from outside the crate.
#[derive(Debug)]
pub struct HeapNode<T, K: Key = u32> {
    pub(crate) value: T,
    pub(crate) slot: K,
    pub(crate) owner: HeapId,
}

impl<T, K: Key> HeapNode<T, K> {
    /// Returns the stored value.
    #[inline]
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Returns the node's current position in its owning heap.
    #[inline]
    pub fn slot(&self) -> K {
        self.slot
    }

    /// Returns the id of the heap currently holding this node.
    #[inline]
    pub fn owner(&self) -> HeapId {
        self.owner
    }
}

/// A fixed-capacity binary heap over external storage.
///
/// # Type Parameters
///
/// - `T`: Element type
/// - `S`: Storage type (e.g., [`BoxedHeapStorage<T>`])
/// - `K`: Key type (default `u32`)
#[derive(Debug)]
pub struct IndexableHeap<T, S, K: Key = u32>
where
    S: Storage<HeapNode<T, K>, Key = K>,
{
    id: HeapId,
    mode: Mode,
    capacity: usize,
    /// Heap-ordered storage keys; never grows past `capacity`.
    slots: Vec<K>,
    _marker: PhantomData<(T, S)>,
}

impl<T, S, K: Key> IndexableHeap<T, S, K>
where
    T: Ord,
    S: Storage<HeapNode<T, K>, Key = K>,
{
    /// Creates an empty heap that holds at most `capacity` nodes.
    ///
    /// # Errors
    ///
    /// - [`Error::ZeroCapacity`] if `capacity` is 0
    /// - [`Error::CapacityOverflow`] if `K` cannot address `capacity` slots
    pub fn with_capacity(mode: Mode, capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::ZeroCapacity);
        }
        Self::bounded(mode, capacity)
    }

    /// Same as [`with_capacity`](Self::with_capacity) but accepts zero.
    ///
    /// The rolling median's upper half of a one-sample window is such a heap.
    pub(crate) fn bounded(mode: Mode, capacity: usize) -> Result<Self> {
        let max = K::max_capacity();
        if capacity > max {
            return Err(Error::CapacityOverflow { capacity, max });
        }

        let id = HeapId::next();
        tracing::debug!(%id, ?mode, capacity, "created indexable heap");

        Ok(Self {
            id,
            mode,
            capacity,
            slots: Vec::with_capacity(capacity),
            _marker: PhantomData,
        })
    }

    /// Returns this heap's identity.
    #[inline]
    pub fn id(&self) -> HeapId {
        self.id
    }

    /// Returns the heap's ordering.
    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the fixed capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of nodes in the heap.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if the heap is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns `true` if the heap holds `capacity` nodes.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.slots.len() == self.capacity
    }

    /// Returns the root's key, or `None` if empty.
    #[inline]
    pub fn root_key(&self) -> Option<K> {
        self.slots.first().copied()
    }

    /// Returns the root value, or `None` if empty. O(1).
    #[inline]
    pub fn root<'a>(&self, storage: &'a S) -> Option<&'a T> {
        self.root_key().map(|key| &Self::node(storage, key).value)
    }

    /// Returns the value at `key` if this heap holds that node.
    #[inline]
    pub fn get<'a>(&self, storage: &'a S, key: K) -> Option<&'a T> {
        storage
            .get(key)
            .filter(|node| node.owner == self.id)
            .map(HeapNode::value)
    }

    /// Returns `true` if `key` names a node held by this heap.
    #[inline]
    pub fn contains(&self, storage: &S, key: K) -> bool {
        self.get(storage, key).is_some()
    }

    /// Iterates over node keys in slot order (array order, not sorted).
    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.slots.iter().copied()
    }

    /// Inserts `value` as a new node and returns its key. O(log n).
    ///
    /// # Errors
    ///
    /// - [`Error::CapacityExceeded`] if the heap is full
    /// - [`Error::StorageFull`] if storage refuses the node
    pub fn add(&mut self, storage: &mut S, value: T) -> Result<K> {
        if self.is_full() {
            return Err(Error::CapacityExceeded {
                capacity: self.capacity,
            });
        }

        let pos = self.slots.len();
        let key = storage
            .try_insert(HeapNode {
                value,
                slot: K::from_usize(pos),
                owner: self.id,
            })
            .map_err(|_full| Error::StorageFull)?;

        self.slots.push(key);
        self.sift_up(storage, pos);
        Ok(key)
    }

    /// Replaces the value of the node at `key`. O(log n).
    ///
    /// An equal value is a no-op: no slot changes. Otherwise the node sifts
    /// in one direction only, decided by comparing the new value to the old.
    ///
    /// # Errors
    ///
    /// [`Error::ForeignNode`] if `key` does not name a node in this heap.
    pub fn update(&mut self, storage: &mut S, key: K, value: T) -> Result<()> {
        let mode = self.mode;
        let node = match storage.get_mut(key) {
            Some(node) if node.owner == self.id => node,
            _ => return Err(Error::ForeignNode),
        };
        if node.value == value {
            return Ok(());
        }

        let old = std::mem::replace(&mut node.value, value);
        let rises = mode.outranks(&node.value, &old);
        let pos = node.slot.as_usize();
        debug_assert_eq!(self.slots[pos], key, "node slot out of sync");

        if rises {
            self.sift_up(storage, pos);
        } else {
            self.sift_down(storage, pos);
        }
        Ok(())
    }

    /// Exchanges this heap's root with `other`'s root. O(log n) per heap.
    ///
    /// Each relocated node takes the new heap's id and is sifted down from
    /// slot 0. Both heaps must share `storage`.
    ///
    /// # Errors
    ///
    /// [`Error::Empty`] if either heap is empty.
    pub fn swap_root_with(&mut self, other: &mut Self, storage: &mut S) -> Result<()> {
        let (Some(mine), Some(theirs)) = (self.root_key(), other.root_key()) else {
            return Err(Error::Empty);
        };

        self.slots[0] = theirs;
        other.slots[0] = mine;
        Self::adopt(storage, theirs, self.id);
        Self::adopt(storage, mine, other.id);

        self.sift_down(storage, 0);
        other.sift_down(storage, 0);

        tracing::trace!(from = %self.id, to = %other.id, "exchanged heap roots");
        Ok(())
    }

    /// Removes every node from the heap and from storage.
    pub fn clear(&mut self, storage: &mut S) {
        for key in self.slots.drain(..) {
            storage.remove(key);
        }
    }

    /// Moves the node at `pos` toward the root while it outranks its parent.
    fn sift_up(&mut self, storage: &mut S, pos: usize) {
        let key = self.slots[pos];
        let mut hole = pos;

        while hole > 0 {
            let parent = (hole - 1) / 2;
            let parent_key = self.slots[parent];

            if !self.mode.outranks(
                &Self::node(storage, key).value,
                &Self::node(storage, parent_key).value,
            ) {
                break;
            }

            self.slots[hole] = parent_key;
            Self::node_mut(storage, parent_key).slot = K::from_usize(hole);
            hole = parent;
        }

        if hole != pos {
            self.place(storage, key, hole);
        }
    }

    /// Moves the node at `pos` away from the root while a child outranks it.
    fn sift_down(&mut self, storage: &mut S, pos: usize) {
        let len = self.slots.len();
        let key = self.slots[pos];
        let mut hole = pos;

        loop {
            let left = 2 * hole + 1;
            if left >= len {
                break;
            }

            let right = left + 1;
            let mut child = left;
            if right < len
                && self.mode.outranks(
                    &Self::node(storage, self.slots[right]).value,
                    &Self::node(storage, self.slots[left]).value,
                )
            {
                child = right;
            }

            let child_key = self.slots[child];
            if !self.mode.outranks(
                &Self::node(storage, child_key).value,
                &Self::node(storage, key).value,
            ) {
                break;
            }

            self.slots[hole] = child_key;
            Self::node_mut(storage, child_key).slot = K::from_usize(hole);
            hole = child;
        }

        if hole != pos {
            self.place(storage, key, hole);
        }
    }

    #[inline]
    fn place(&mut self, storage: &mut S, key: K, pos: usize) {
        self.slots[pos] = key;
        Self::node_mut(storage, key).slot = K::from_usize(pos);
    }

    /// Reassigns `key` to the root slot of the heap `owner`.
    #[inline]
    fn adopt(storage: &mut S, key: K, owner: HeapId) {
        let node = Self::node_mut(storage, key);
        node.owner = owner;
        node.slot = K::from_usize(0);
    }

    // Keys in `slots` are always occupied in the heap's storage. A miss means
    // the heap was handed a different storage instance.

    #[inline]
    fn node(storage: &S, key: K) -> &HeapNode<T, K> {
        storage
            .get(key)
            .expect("heap slot refers to a vacant storage entry")
    }

    #[inline]
    fn node_mut(storage: &mut S, key: K) -> &mut HeapNode<T, K> {
        storage
            .get_mut(key)
            .expect("heap slot refers to a vacant storage entry")
    }
}
