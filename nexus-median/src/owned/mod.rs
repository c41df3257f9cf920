//! Convenience wrappers that own their storage.
//!
//! [`OwnedHeap`] combines an [`IndexableHeap`](crate::IndexableHeap) with its
//! own backing storage, so callers don't pass `&mut storage` to every method.
//!
//! # When to use the raw variant
//!
//! Use [`IndexableHeap`](crate::IndexableHeap) with external storage when
//! two heaps need to exchange roots: both must coordinate over the same
//! storage instance, which an owned wrapper cannot share.
//!
//! # Example
//!
//! ```
//! use nexus_median::{Mode, OwnedHeap};
//!
//! let mut heap: OwnedHeap<u64> = OwnedHeap::with_capacity(Mode::Min, 4).unwrap();
//! let key = heap.add(5).unwrap();
//! heap.add(3).unwrap();
//! assert_eq!(heap.root(), Some(&3));
//!
//! heap.update(key, 1).unwrap();
//! assert_eq!(heap.root(), Some(&1));
//! ```

mod heap;

pub use heap::OwnedHeap;
