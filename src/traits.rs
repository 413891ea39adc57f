//! # Count Tracker Trait
//!
//! The operation set that cache policies need from a frequency tracker. It
//! lets a policy such as [`LfuCache`](crate::policy::lfu::LfuCache) stay
//! generic over the tracker it consults for eviction.
//!
//! ```text
//!   ┌─────────────────────────────────────────────┐
//!   │              CountTracker<K>                │
//!   │                                             │
//!   │  increment(&mut, K) → u64                   │
//!   │  decrement(&mut, &K) → Option<u64>          │
//!   │  count(&, &K) → u64                         │
//!   │  max(&) → Option<(&K, u64)>  oldest at max  │
//!   │  min(&) → Option<(&K, u64)>  newest at min  │
//!   │  remove / pop_min / len / clear             │
//!   └──────────────────────┬──────────────────────┘
//!                          │
//!                          ▼
//!                ┌───────────────────┐
//!                │  MinMaxCounter<K> │
//!                └───────────────────┘
//! ```
//!
//! All operations are total. Absent keys read as count 0, decrementing an
//! absent key is a no-op, and extremes of an empty tracker are `None`.

/// Key-frequency tracking with global extremes.
///
/// # Example
///
/// ```
/// use countkit::ds::MinMaxCounter;
/// use countkit::traits::CountTracker;
///
/// fn hottest<T: CountTracker<u32>>(tracker: &T) -> Option<u32> {
///     tracker.max().map(|(key, _)| *key)
/// }
///
/// let mut counter = MinMaxCounter::new();
/// CountTracker::increment(&mut counter, 7);
/// CountTracker::increment(&mut counter, 7);
/// CountTracker::increment(&mut counter, 9);
/// assert_eq!(hottest(&counter), Some(7));
/// ```
pub trait CountTracker<K> {
    /// Increases `key`'s count by one, creating it at 1 if absent.
    fn increment(&mut self, key: K) -> u64;

    /// Decreases `key`'s count by one; `None` if absent. Count 0 removes
    /// the key.
    fn decrement(&mut self, key: &K) -> Option<u64>;

    /// Current count, 0 if absent.
    fn count(&self, key: &K) -> u64;

    fn contains(&self, key: &K) -> bool {
        self.count(key) > 0
    }

    /// Oldest key at the highest count.
    fn max(&self) -> Option<(&K, u64)>;

    /// Newest key at the lowest non-zero count.
    fn min(&self) -> Option<(&K, u64)>;

    /// Drops `key` regardless of count, returning the count it had.
    fn remove(&mut self, key: &K) -> Option<u64>;

    /// Removes and returns the entry [`min`](Self::min) reports.
    fn pop_min(&mut self) -> Option<(K, u64)>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn clear(&mut self);
}
