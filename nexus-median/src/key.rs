//! Key trait for storage indices and heap slots.
//!
//! The [`Key`] trait abstracts over the integer types used to address nodes
//! in storage and to record a node's slot inside its owning heap. A reserved
//! sentinel (`NONE`) stands in for "no node" so ring entries and slots stay
//! a single machine word instead of an `Option`.

use std::sync::atomic::{AtomicU64, Ordering};

/// A copyable key type with a sentinel "none" value.
///
/// # Example
///
/// ```
/// use nexus_median::Key;
///
/// let key: u32 = 5;
/// assert!(key.is_some());
/// assert!(u32::NONE.is_none());
/// assert_eq!(u32::max_capacity(), u32::MAX as usize);
/// ```
pub trait Key: Copy + Eq + core::fmt::Debug + 'static {
    /// Sentinel value representing "no key".
    const NONE: Self;

    /// Creates a key from a `usize` value.
    fn from_usize(val: usize) -> Self;

    /// Returns the key as a `usize`.
    fn as_usize(self) -> usize;

    /// Returns `true` if this is the sentinel value.
    #[inline]
    fn is_none(self) -> bool {
        self == Self::NONE
    }

    /// Returns `true` if this is not the sentinel value.
    #[inline]
    fn is_some(self) -> bool {
        !self.is_none()
    }

    /// Largest number of distinct keys this type can address.
    ///
    /// The sentinel is reserved, so a capacity of exactly `NONE` is the
    /// upper bound (keys `0..NONE`).
    #[inline]
    fn max_capacity() -> usize {
        Self::NONE.as_usize()
    }
}

macro_rules! impl_key_for_unsigned {
    ($($ty:ty),*) => {
        $(
            impl Key for $ty {
                const NONE: Self = <$ty>::MAX;

                #[inline]
                fn from_usize(val: usize) -> Self {
                    val as Self
                }

                #[inline]
                fn as_usize(self) -> usize {
                    self as usize
                }
            }
        )*
    };
}

impl_key_for_unsigned!(u8, u16, u32, u64, usize);

/// Identity of a heap instance.
///
/// Every node records the id of the heap that currently holds it. Ids come
/// from a 64-bit counter and are unique per process, so a key presented to the wrong heap is detected even
/// when both heaps share one storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeapId(u64);

impl HeapId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw id.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for HeapId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "heap#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_key_sentinel {
        ($($ty:ty => $name:ident),*) => {
            $(
                #[test]
                fn $name() {
                    assert!(<$ty>::NONE.is_none());
                    assert!(!<$ty>::NONE.is_some());
                    assert!((0 as $ty).is_some());
                    assert!((<$ty>::MAX - 1).is_some());
                    assert_eq!(<$ty>::max_capacity(), <$ty>::MAX as usize);
                }
            )*
        };
    }

    test_key_sentinel!(
        u8 => u8_sentinel,
        u16 => u16_sentinel,
        u32 => u32_sentinel,
        u64 => u64_sentinel,
        usize => usize_sentinel
    );

    #[test]
    fn from_usize_roundtrip() {
        for i in [0usize, 1, 100, 1000, u16::MAX as usize] {
            assert_eq!(u32::from_usize(i).as_usize(), i);
        }
    }

    #[test]
    fn heap_ids_are_unique() {
        let a = HeapId::next();
        let b = HeapId::next();
        assert_ne!(a, b);
        assert_eq!(format!("{a}"), format!("heap#{}", a.get()));
    }

    #[test]
    fn heap_ids_are_64_bit() {
        let id = HeapId::next();
        let raw: u64 = id.get();
        assert!(HeapId::next().get() > raw);
        assert_eq!(core::mem::size_of::<HeapId>(), 8);
    }
}
