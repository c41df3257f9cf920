//! Rolling median over a fixed window, built on an indexable binary heap.
//!
//! The crate has two layers:
//!
//! ```text
//! RollingMedian      - window of N samples, O(log N) push, O(1) median
//!     │
//!     └── IndexableHeap (Max) + IndexableHeap (Min)
//!             │
//!             └── Storage - owns the nodes, provides stable keys
//! ```
//!
//! # Design Philosophy
//!
//! Like a slab-backed collection, heaps here coordinate keys and don't own
//! their nodes. A node records its slot and the heap holding it, so:
//!
//! - **In-place update**: replace a value by key and re-sift, O(log n)
//! - **Root exchange**: two heaps sharing storage can trade roots, O(log n)
//! - **Stable keys**: a node's key survives reslotting and heap moves
//! - **Zero allocation on hot path**: everything is sized at construction
//!
//! # Quick Start
//!
//! ```
//! use nexus_median::{Median, RollingMedian};
//!
//! let mut window: RollingMedian<u32> = RollingMedian::with_capacity(4).unwrap();
//! window.extend([5, 1, 3, 2]);
//!
//! // Even window: both middle values
//! assert_eq!(window.median(), Ok(Median::Pair(&2, &3)));
//! assert_eq!(window.median_value(), Ok(2));
//!
//! // Full window: the oldest sample (5) is overwritten
//! window.push(9);
//! assert_eq!(window.median(), Ok(Median::Pair(&2, &3)));
//! ```
//!
//! # Using the heap directly
//!
//! ```
//! use nexus_median::{BoxedHeapStorage, IndexableHeap, Mode};
//!
//! let mut storage: BoxedHeapStorage<i32> = BoxedHeapStorage::with_capacity(4);
//! let mut low = IndexableHeap::with_capacity(Mode::Max, 2).unwrap();
//! let mut high = IndexableHeap::with_capacity(Mode::Min, 2).unwrap();
//!
//! low.add(&mut storage, 8).unwrap();
//! high.add(&mut storage, 3).unwrap();
//!
//! // Trade roots; both heaps keep using the same storage
//! low.swap_root_with(&mut high, &mut storage).unwrap();
//! assert_eq!(low.root(&storage), Some(&3));
//! assert_eq!(high.root(&storage), Some(&8));
//! ```
//!
//! # Floating-point samples
//!
//! Heaps require [`Ord`]. Wrap floats in [`ordered_float::OrderedFloat`],
//! which also implements [`Midpoint`].
//!
//! # Threading
//!
//! Nothing here synchronizes. Wrap a structure in a lock if it is shared.
//!
//! # Feature Flags
//!
//! - `slab` - Enable [`Storage`] impl for `slab::Slab`

#![warn(missing_docs)]

pub mod error;
pub mod heap;
pub mod key;
pub mod median;
pub mod midpoint;
pub mod owned;
pub mod storage;

pub use error::{Error, ErrorKind, Result};
pub use heap::{BoxedHeapStorage, HeapNode, IndexableHeap, Mode};
pub use key::{HeapId, Key};
pub use median::{Median, RollingMedian};
pub use midpoint::Midpoint;
pub use owned::OwnedHeap;
pub use storage::{BoxedStorage, Full, Storage};

#[cfg(feature = "slab")]
pub use heap::SlabHeapStorage;
