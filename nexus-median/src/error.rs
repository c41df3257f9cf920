// nexus-median/src/error.rs

//! Error types for heap and rolling-median operations.
//!
//! Every error is a precondition violation reported as soon as it is
//! detected. A failed call leaves the structure exactly as it was.

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors returned by [`IndexableHeap`](crate::IndexableHeap),
/// [`OwnedHeap`](crate::OwnedHeap) and [`RollingMedian`](crate::RollingMedian).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A constructor was given a capacity of zero.
    #[error("capacity must be at least 1")]
    ZeroCapacity,

    /// A constructor was given a capacity the key type cannot address.
    #[error("capacity {capacity} exceeds key range (max {max})")]
    CapacityOverflow {
        /// Requested capacity.
        capacity: usize,
        /// Largest capacity the key type supports.
        max: usize,
    },

    /// `add` on a heap that already holds `capacity` nodes.
    #[error("heap is full (capacity {capacity})")]
    CapacityExceeded {
        /// The heap's fixed capacity.
        capacity: usize,
    },

    /// The backing storage refused a new node.
    #[error("node storage is full")]
    StorageFull,

    /// The operation needs at least one element.
    #[error("operation requires a non-empty structure")]
    Empty,

    /// The key does not name a node held by this heap.
    #[error("node does not belong to this heap")]
    ForeignNode,
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad constructor parameters.
    InvalidArgument,
    /// Insertion past a fixed capacity.
    CapacityExceeded,
    /// Operation on an empty structure, or with a node from elsewhere.
    InvalidOperation,
}

impl Error {
    /// Returns the kind of this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ZeroCapacity | Self::CapacityOverflow { .. } => ErrorKind::InvalidArgument,
            Self::CapacityExceeded { .. } | Self::StorageFull => ErrorKind::CapacityExceeded,
            Self::Empty | Self::ForeignNode => ErrorKind::InvalidOperation,
        }
    }
}
