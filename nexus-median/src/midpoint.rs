//! Combining the two middle values of an even-length window.

use ordered_float::OrderedFloat;

/// Types whose two middle samples can be merged into one median value.
///
/// Integers return the exact mean truncated toward zero, without overflow.
/// Floats return the correctly rounded arithmetic mean, exact for subnormals
/// and without overflow.
///
/// # Example
///
/// ```
/// use nexus_median::Midpoint;
///
/// assert_eq!(Midpoint::mid(2u32, 3u32), 2);
/// assert_eq!(Midpoint::mid(-3i64, 0i64), -1);
/// assert_eq!(Midpoint::mid(u64::MAX, u64::MAX - 2), u64::MAX - 1);
/// assert_eq!(Midpoint::mid(1.0f64, 2.0f64), 1.5);
/// ```
pub trait Midpoint: Sized {
    /// Returns the value halfway between `self` and `other`.
    fn mid(self, other: Self) -> Self;
}

macro_rules! impl_midpoint_widening {
    ($wide:ty => $($ty:ty),*) => {
        $(
            impl Midpoint for $ty {
                #[inline]
                fn mid(self, other: Self) -> Self {
                    ((self as $wide + other as $wide) / 2) as $ty
                }
            }
        )*
    };
}

impl_midpoint_widening!(i128 => i8, i16, i32, i64, isize);
impl_midpoint_widening!(u128 => u8, u16, u32, u64, usize);

impl Midpoint for u128 {
    #[inline]
    fn mid(self, other: Self) -> Self {
        self / 2 + other / 2 + (self % 2 + other % 2) / 2
    }
}

macro_rules! impl_midpoint_float {
    ($($ty:ty),*) => {
        $(
            impl Midpoint for $ty {
                #[inline]
                fn mid(self, other: Self) -> Self {
                    <$ty>::midpoint(self, other)
                }
            }

            impl Midpoint for OrderedFloat<$ty> {
                #[inline]
                fn mid(self, other: Self) -> Self {
                    OrderedFloat(self.0.mid(other.0))
                }
            }
        )*
    };
}

impl_midpoint_float!(f32, f64);
