//! Rolling median over a fixed-size window.
//!
//! [`RollingMedian`] splits the window between a max-heap holding the lower
//! half and a min-heap holding the upper half. Both heaps coordinate over one
//! [`BoxedHeapStorage`], and a ring of storage keys remembers which node holds
//! each sample position.
//!
//! Once the window is full a new sample overwrites the oldest node in place:
//! no node is created or freed, the node's key never changes, and the only
//! cross-heap traffic is at most one root exchange per push.
//!
//! ```text
//!        lower (Max)            upper (Min)
//!     ┌───────────────┐      ┌───────────────┐
//!     │ root = max(lo)│ <=   │ root = min(hi)│
//!     └───────────────┘      └───────────────┘
//!            ▲                      ▲
//!            └──── ring[cursor] ────┘   (key of the oldest sample)
//! ```
//!
//! The lower heap holds `ceil(n / 2)` samples and the upper heap
//! `floor(n / 2)`, so an odd-length window's middle value is the lower root.

use crate::heap::{BoxedHeapStorage, IndexableHeap, Mode};
use crate::{Error, Key, Midpoint, Result, Storage};

/// The middle of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Median<T> {
    /// Odd number of samples: the single middle value.
    Single(T),
    /// Even number of samples: the lower and upper middle values.
    Pair(T, T),
}

impl<T> Median<T> {
    /// Returns the lower middle value (the only one for [`Median::Single`]).
    #[inline]
    pub fn low(&self) -> &T {
        match self {
            Self::Single(v) | Self::Pair(v, _) => v,
        }
    }

    /// Returns the upper middle value (the only one for [`Median::Single`]).
    #[inline]
    pub fn high(&self) -> &T {
        match self {
            Self::Single(v) | Self::Pair(_, v) => v,
        }
    }

    /// Applies `f` to every middle value.
    pub fn map<U, F: FnMut(T) -> U>(self, mut f: F) -> Median<U> {
        match self {
            Self::Single(v) => Median::Single(f(v)),
            Self::Pair(lo, hi) => Median::Pair(f(lo), f(hi)),
        }
    }
}

impl<T: Midpoint> Median<T> {
    /// Collapses the median into one value, averaging a pair.
    #[inline]
    pub fn mean(self) -> T {
        match self {
            Self::Single(v) => v,
            Self::Pair(lo, hi) => lo.mid(hi),
        }
    }
}

impl<T: Clone> Median<&T> {
    /// Clones the borrowed middle values.
    #[inline]
    pub fn cloned(self) -> Median<T> {
        self.map(T::clone)
    }
}

/// Median of the most recent `capacity` samples.
///
/// All memory is allocated by [`with_capacity`](Self::with_capacity); pushes
/// after the window first fills never allocate.
///
/// # Example
///
/// ```
/// use nexus_median::{Median, RollingMedian};
///
/// let mut window: RollingMedian<i64> = RollingMedian::with_capacity(3).unwrap();
///
/// window.push(6);
/// window.push(2);
/// window.push(4);
/// assert_eq!(window.median(), Ok(Median::Single(&4)));
///
/// // Replaces the oldest sample (6)
/// window.push(1);
/// assert_eq!(window.median(), Ok(Median::Single(&2)));
/// assert_eq!(window.window().copied().collect::<Vec<_>>(), vec![2, 4, 1]);
/// ```
#[derive(Debug)]
pub struct RollingMedian<T: Ord, K: Key = u32> {
    storage: BoxedHeapStorage<T, K>,
    lower: IndexableHeap<T, BoxedHeapStorage<T, K>, K>,
    upper: IndexableHeap<T, BoxedHeapStorage<T, K>, K>,
    /// Storage key for each sample position; `K::NONE` until first written.
    ring: Box<[K]>,
    /// Next ring position to write; holds the oldest sample once full.
    cursor: usize,
}

impl<T: Ord, K: Key> RollingMedian<T, K> {
    /// Creates an empty window of `capacity` samples.
    ///
    /// # Errors
    ///
    /// - [`Error::ZeroCapacity`] if `capacity` is 0
    /// - [`Error::CapacityOverflow`] if `K` cannot address `capacity` nodes
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::ZeroCapacity);
        }
        let max = K::max_capacity();
        if capacity > max {
            return Err(Error::CapacityOverflow { capacity, max });
        }

        let lower = IndexableHeap::bounded(Mode::Max, capacity.div_ceil(2))?;
        let upper = IndexableHeap::bounded(Mode::Min, capacity / 2)?;
        tracing::debug!(
            capacity,
            lower = %lower.id(),
            upper = %upper.id(),
            "created rolling median"
        );

        Ok(Self {
            storage: BoxedHeapStorage::with_capacity(capacity),
            lower,
            upper,
            ring: vec![K::NONE; capacity].into_boxed_slice(),
            cursor: 0,
        })
    }

    /// Returns the window size.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.ring.len()
    }

    /// Returns the number of live samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.lower.len() + self.upper.len()
    }

    /// Returns `true` if no sample has been pushed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }

    /// Returns `true` once `capacity` samples have been pushed.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() == self.capacity()
    }

    /// Returns the number of samples in the lower half.
    #[inline]
    pub fn lower_len(&self) -> usize {
        self.lower.len()
    }

    /// Returns the number of samples in the upper half.
    #[inline]
    pub fn upper_len(&self) -> usize {
        self.upper.len()
    }

    /// Adds a sample, evicting the oldest one if the window is full.
    /// O(log n).
    pub fn push(&mut self, value: T) {
        if self.is_full() {
            let key = self.ring[self.cursor];
            let heap = if self.lower.contains(&self.storage, key) {
                &mut self.lower
            } else {
                &mut self.upper
            };
            if let Err(err) = heap.update(&mut self.storage, key, value) {
                unreachable!("ring key {key:?} not held by either heap: {err}");
            }
        } else {
            // Even count goes low so the lower half leads on odd counts.
            let heap = if self.len() % 2 == 0 {
                &mut self.lower
            } else {
                &mut self.upper
            };
            match heap.add(&mut self.storage, value) {
                Ok(key) => self.ring[self.cursor] = key,
                Err(err) => unreachable!("window split out of sync: {err}"),
            }
        }

        self.rebalance();

        self.cursor += 1;
        if self.cursor == self.ring.len() {
            self.cursor = 0;
            tracing::trace!(capacity = self.ring.len(), "window wrapped");
        }
    }

    /// Returns the middle value(s) of the window. O(1).
    ///
    /// # Errors
    ///
    /// [`Error::Empty`] if no sample has been pushed.
    pub fn median(&self) -> Result<Median<&T>> {
        let low = self.lower.root(&self.storage).ok_or(Error::Empty)?;
        if self.lower.len() > self.upper.len() {
            return Ok(Median::Single(low));
        }

        let high = self.upper.root(&self.storage).ok_or(Error::Empty)?;
        Ok(Median::Pair(low, high))
    }

    /// Returns the median as one value, averaging the middle pair of an
    /// even-length window.
    ///
    /// # Errors
    ///
    /// [`Error::Empty`] if no sample has been pushed.
    pub fn median_value(&self) -> Result<T>
    where
        T: Midpoint + Clone,
    {
        self.median().map(|median| median.cloned().mean())
    }

    /// Iterates over live samples, oldest first.
    pub fn window(&self) -> impl Iterator<Item = &T> + '_ {
        let len = self.len();
        let capacity = self.ring.len();
        let start = if len == capacity { self.cursor } else { 0 };

        (0..len).filter_map(move |i| {
            let key = self.ring[(start + i) % capacity];
            self.storage.get(key).map(|node| node.value())
        })
    }

    /// Drops every sample, returning to the freshly constructed state.
    pub fn clear(&mut self) {
        self.lower.clear(&mut self.storage);
        self.upper.clear(&mut self.storage);
        self.ring.fill(K::NONE);
        self.cursor = 0;
    }

    /// Restores `upper.root >= lower.root` after a single insert or update.
    ///
    /// Before the mutation every lower value was `<=` every upper value, so
    /// one exchange of roots is always enough.
    fn rebalance(&mut self) {
        let crossed = match (
            self.lower.root(&self.storage),
            self.upper.root(&self.storage),
        ) {
            (Some(low), Some(high)) => high < low,
            _ => false,
        };

        if crossed {
            if let Err(err) = self
                .lower
                .swap_root_with(&mut self.upper, &mut self.storage)
            {
                unreachable!("root exchange on non-empty heaps failed: {err}");
            }
        }
    }
}

impl<T: Ord, K: Key> Extend<T> for RollingMedian<T, K> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap::tests::check_heap;

    use ordered_float::OrderedFloat;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn check_invariants<T: Ord + core::fmt::Debug, K: Key>(window: &RollingMedian<T, K>) {
        check_heap(&window.lower, &window.storage);
        check_heap(&window.upper, &window.storage);

        assert!(window.len() <= window.capacity());
        let lo = window.lower.len();
        let hi = window.upper.len();
        assert!(lo == hi || lo == hi + 1, "unbalanced: {lo} vs {hi}");

        if let (Some(low), Some(high)) = (
            window.lower.root(&window.storage),
            window.upper.root(&window.storage),
        ) {
            assert!(high >= low, "roots crossed: {low:?} > {high:?}");
        }
    }

    /// Sort-the-window reference answer.
    fn naive_median(samples: &[i64]) -> Median<i64> {
        let mut sorted = samples.to_vec();
        sorted.sort_unstable();
        let n = sorted.len();
        if n % 2 == 1 {
            Median::Single(sorted[n / 2])
        } else {
            Median::Pair(sorted[n / 2 - 1], sorted[n / 2])
        }
    }

    #[test]
    fn zero_capacity_rejected() {
        assert_eq!(
            RollingMedian::<i64>::with_capacity(0).unwrap_err(),
            Error::ZeroCapacity
        );
    }

    #[test]
    fn capacity_beyond_key_range_rejected() {
        let err = RollingMedian::<i64, u8>::with_capacity(1_000).unwrap_err();
        assert_eq!(
            err,
            Error::CapacityOverflow {
                capacity: 1_000,
                max: 255
            }
        );
    }

    #[test]
    fn capacity_split() {
        for (capacity, lower, upper) in [(1, 1, 0), (2, 1, 1), (3, 2, 1), (4, 2, 2), (7, 4, 3)] {
            let window: RollingMedian<i64> = RollingMedian::with_capacity(capacity).unwrap();
            assert_eq!(window.lower.capacity(), lower);
            assert_eq!(window.upper.capacity(), upper);
        }
    }

    #[test]
    fn empty_median_fails() {
        let window: RollingMedian<i64> = RollingMedian::with_capacity(4).unwrap();
        assert!(window.is_empty());
        assert_eq!(window.median(), Err(Error::Empty));
        assert_eq!(window.median_value(), Err(Error::Empty));
    }

    #[test]
    fn odd_then_overwrite() {
        let mut window: RollingMedian<i64> = RollingMedian::with_capacity(3).unwrap();
        window.extend([6, 2, 4]);
        assert_eq!(window.median(), Ok(Median::Single(&4)));

        window.push(1);
        assert_eq!(window.len(), 3);
        assert_eq!(window.median(), Ok(Median::Single(&2)));
        check_invariants(&window);
    }

    #[test]
    fn even_window_returns_pair() {
        let mut window: RollingMedian<i64> = RollingMedian::with_capacity(4).unwrap();
        window.extend([5, 1, 3, 2]);

        assert_eq!(window.median(), Ok(Median::Pair(&2, &3)));
        assert_eq!(window.median_value(), Ok(2));
        check_invariants(&window);
    }

    #[test]
    fn single_slot_window() {
        let mut window: RollingMedian<i64> = RollingMedian::with_capacity(1).unwrap();
        window.push(10);
        assert_eq!(window.median(), Ok(Median::Single(&10)));

        window.push(7);
        assert_eq!(window.median(), Ok(Median::Single(&7)));
        assert_eq!(window.upper_len(), 0);
        check_invariants(&window);
    }

    #[test]
    fn lower_half_leads_while_filling() {
        let mut window: RollingMedian<i64> = RollingMedian::with_capacity(6).unwrap();
        for (i, v) in [9, 8, 7, 6, 5, 4].into_iter().enumerate() {
            window.push(v);
            let n = i + 1;
            assert_eq!(window.lower_len(), n.div_ceil(2));
            assert_eq!(window.upper_len(), n / 2);
            check_invariants(&window);
        }
    }

    #[test]
    fn nodes_are_reused_after_fill() {
        let mut window: RollingMedian<i64> = RollingMedian::with_capacity(5).unwrap();
        window.extend(0..5);
        let keys = window.ring.clone();

        for v in 100..150 {
            window.push(v);
            assert_eq!(window.storage.len(), 5);
        }

        assert_eq!(window.ring, keys);
        check_invariants(&window);
    }

    #[test]
    fn window_iterates_oldest_first() {
        let mut window: RollingMedian<i64> = RollingMedian::with_capacity(3).unwrap();
        assert_eq!(window.window().count(), 0);

        window.extend([1, 2]);
        assert_eq!(window.window().copied().collect::<Vec<_>>(), vec![1, 2]);

        window.extend([3, 4, 5]);
        assert_eq!(window.window().copied().collect::<Vec<_>>(), vec![3, 4, 5]);
    }

    #[test]
    fn clear_resets_window() {
        let mut window: RollingMedian<i64> = RollingMedian::with_capacity(3).unwrap();
        window.extend([1, 2, 3, 4]);

        window.clear();
        assert!(window.is_empty());
        assert_eq!(window.median(), Err(Error::Empty));

        window.extend([7, 8]);
        assert_eq!(window.median(), Ok(Median::Pair(&7, &8)));
        check_invariants(&window);
    }

    #[test]
    fn median_helpers() {
        let single = Median::Single(3);
        assert_eq!(single.low(), &3);
        assert_eq!(single.high(), &3);
        assert_eq!(single.mean(), 3);

        let pair = Median::Pair(2, 5);
        assert_eq!(pair.low(), &2);
        assert_eq!(pair.high(), &5);
        assert_eq!(pair.map(|v| v * 10), Median::Pair(20, 50));
        assert_eq!(pair.mean(), 3);
    }

    #[test]
    fn float_samples() {
        let mut window: RollingMedian<OrderedFloat<f64>> =
            RollingMedian::with_capacity(4).unwrap();
        window.extend([0.5, 2.5, 1.5, 9.0].map(OrderedFloat));

        assert_eq!(window.median_value(), Ok(OrderedFloat(2.0)));
    }

    #[test]
    fn subnormal_pair_median() {
        let tiny = OrderedFloat(f64::from_bits(1));
        let mut window: RollingMedian<OrderedFloat<f64>> =
            RollingMedian::with_capacity(2).unwrap();
        window.extend([tiny, tiny]);

        assert_eq!(window.median(), Ok(Median::Pair(&tiny, &tiny)));
        assert_eq!(window.median_value(), Ok(tiny));
    }

    #[test]
    fn matches_sorted_reference() {
        let mut rng = StdRng::seed_from_u64(42);

        for capacity in [1usize, 2, 3, 4, 5, 8, 13, 32] {
            let mut window: RollingMedian<i64> = RollingMedian::with_capacity(capacity).unwrap();
            let mut samples: Vec<i64> = Vec::new();

            for _ in 0..500 {
                // Narrow range so ties are common.
                let v = rng.random_range(-20..20);
                window.push(v);
                samples.push(v);
                let start = samples.len().saturating_sub(capacity);
                let live = &samples[start..];

                assert_eq!(window.median().map(Median::cloned), Ok(naive_median(live)));
                assert!(window.window().eq(live.iter()));
                check_invariants(&window);
            }
        }
    }
}
