//! Key-frequency counter with O(1) increment, decrement, count, max and min.
//!
//! Keys are grouped into count buckets on a [`BucketChain`]. A key index maps
//! each key to its node, and the node knows its bucket, so every operation is
//! a couple of hash lookups plus at most one bucket splice and one bucket
//! retirement. The chain is never walked.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                       MinMaxCounter<K> Layout                        │
//! │                                                                      │
//! │   index: FxHashMap<K, SlotId>          chain: BucketChain<K>         │
//! │   ┌─────────┬────────┐                                               │
//! │   │   Key   │  node  │       front (min)                back (max)   │
//! │   ├─────────┼────────┤           │                          │        │
//! │   │  "foo"  │  n_0   │──┐        ▼                          ▼        │
//! │   │  "bar"  │  n_1   │──┼──► ┌───────┐      ┌───────┐   ┌───────┐    │
//! │   │  "baz"  │  n_2   │──┘    │ c = 3 │ ◄──► │ c = 4 │◄─►│ c = 9 │    │
//! │   └─────────┴────────┘       └───────┘      └───────┘   └───────┘    │
//! │                               [n_0]       [n_2]◄►[n_1]    [n_5]      │
//! │                                           newest oldest              │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Increment Flow
//! ──────────────
//!
//! ```text
//!   increment("bar")  (bar at count 4)
//!     1. index → n_1, n_1.bucket → count 4
//!     2. count index lookup for 5; missing → splice new bucket after 4
//!     3. move n_1 to the front of bucket 5
//!     4. bucket 4 still holds n_2 → keep it
//!
//!   increment("new")  (absent key)
//!     1. source is a virtual count-0 bucket, never materialized
//!     2. count index lookup for 1; missing → splice at chain front
//!     3. push a fresh node at the front of bucket 1
//! ```
//!
//! ## Tie-breaking
//!
//! Within a bucket the front is the key that most recently arrived at that
//! count and the back is the key that has held it longest.
//!
//! - [`MinMaxCounter::max`] returns the **oldest** key at the highest count.
//! - [`MinMaxCounter::min`] returns the **newest** key at the lowest count.
//!
//! Eviction via [`MinMaxCounter::pop_min`] therefore takes recently promoted
//! entries first when several share the floor count.
//!
//! ## Operations
//!
//! | Operation     | Time  | Notes                                        |
//! |---------------|-------|----------------------------------------------|
//! | `increment`   | O(1)  | Creates the key at count 1 if absent         |
//! | `decrement`   | O(1)  | No-op if absent; drops the key at count 0    |
//! | `count`       | O(1)  | 0 for absent keys                            |
//! | `max`         | O(1)  | Oldest key at the highest count              |
//! | `min`         | O(1)  | Newest key at the lowest count               |
//! | `remove`      | O(1)  | Drops a key regardless of count              |
//! | `pop_min`     | O(1)  | Removes the entry `min` reports              |
//! | `iter_counts` | O(b)  | Walks buckets; b = distinct counts           |
//!
//! ## Example Usage
//!
//! ```
//! use countkit::ds::MinMaxCounter;
//!
//! let mut counter = MinMaxCounter::new();
//! for _ in 0..3 { counter.increment("foo"); }
//! for _ in 0..4 { counter.increment("bar"); }
//!
//! assert_eq!(counter.max(), Some((&"bar", 4)));
//! assert_eq!(counter.min(), Some((&"foo", 3)));
//!
//! counter.increment("foo");
//! counter.increment("foo");
//! assert_eq!(counter.max(), Some((&"foo", 5)));
//! assert_eq!(counter.min(), Some((&"bar", 4)));
//! ```
//!
//! ## Thread Safety
//!
//! - [`MinMaxCounter`]: not synchronized; wrap it or confine it to one thread
//! - [`ConcurrentMinMaxCounter`]: one `parking_lot::RwLock` around the whole
//!   counter, so `max`/`min` stay globally exact

use std::borrow::Borrow;
use std::hash::Hash;

use log::trace;
use rustc_hash::FxHashMap;

use crate::ds::bucket_chain::{BucketChain, BucketIter, DEFAULT_BUCKET_PREALLOC};
use crate::ds::slot_arena::SlotId;
use crate::error::InvariantError;
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::CounterMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::CounterMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{
    CounterMetricsReadRecorder, CounterMetricsRecorder, MetricsReset, MetricsSnapshotProvider,
};
use crate::traits::CountTracker;

/// O(1) key-frequency counter with global min/max queries.
///
/// # Type Parameters
///
/// - `K`: Key type, must be `Eq + Hash + Clone`. Queries accept any borrowed
///   form of the key.
///
/// # Example
///
/// ```
/// use countkit::ds::MinMaxCounter;
///
/// let mut counter: MinMaxCounter<String> = MinMaxCounter::new();
/// counter.increment("cat".to_string());
/// counter.increment("dog".to_string());
/// counter.increment("dog".to_string());
///
/// assert_eq!(counter.count("dog"), 2);
/// assert_eq!(counter.count("cat"), 1);
/// assert_eq!(counter.count("eel"), 0);
///
/// assert_eq!(counter.decrement("cat"), Some(0));
/// assert!(!counter.contains("cat"));
/// ```
#[derive(Debug)]
pub struct MinMaxCounter<K> {
    chain: BucketChain<K>,
    index: FxHashMap<K, SlotId>,
    #[cfg(feature = "metrics")]
    metrics: CounterMetrics,
}

impl<K> MinMaxCounter<K>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty counter.
    ///
    /// Every call produces an independent instance.
    ///
    /// # Example
    ///
    /// ```
    /// use countkit::ds::MinMaxCounter;
    ///
    /// let counter: MinMaxCounter<&str> = MinMaxCounter::new();
    /// assert!(counter.is_empty());
    /// assert_eq!(counter.max(), None);
    /// assert_eq!(counter.min(), None);
    /// ```
    pub fn new() -> Self {
        Self {
            chain: BucketChain::new(),
            index: FxHashMap::default(),
            #[cfg(feature = "metrics")]
            metrics: CounterMetrics::default(),
        }
    }

    /// Creates an empty counter with room for `capacity` keys.
    ///
    /// Uses [`DEFAULT_BUCKET_PREALLOC`] for the count index.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_bucket_hint(capacity, DEFAULT_BUCKET_PREALLOC)
    }

    /// Creates an empty counter with room for `capacity` keys and
    /// `bucket_hint` distinct counts.
    ///
    /// # Example
    ///
    /// ```
    /// use countkit::ds::MinMaxCounter;
    ///
    /// let counter: MinMaxCounter<u64> = MinMaxCounter::with_capacity_and_bucket_hint(1024, 64);
    /// assert!(counter.is_empty());
    /// ```
    pub fn with_capacity_and_bucket_hint(capacity: usize, bucket_hint: usize) -> Self {
        Self {
            chain: BucketChain::with_capacity(capacity, bucket_hint),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            #[cfg(feature = "metrics")]
            metrics: CounterMetrics::default(),
        }
    }

    /// Number of tracked keys (keys with a non-zero count).
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of distinct counts currently present.
    ///
    /// # Example
    ///
    /// ```
    /// use countkit::ds::MinMaxCounter;
    ///
    /// let mut counter = MinMaxCounter::new();
    /// counter.increment("a");
    /// counter.increment("b");
    /// counter.increment("b");
    /// assert_eq!(counter.bucket_count(), 2);
    /// ```
    pub fn bucket_count(&self) -> usize {
        self.chain.bucket_count()
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    /// Increases `key`'s count by one and returns the new count.
    ///
    /// An absent key is created with count 1. A key already at `u64::MAX`
    /// keeps its count and is refreshed to the newest position in its bucket.
    ///
    /// # Example
    ///
    /// ```
    /// use countkit::ds::MinMaxCounter;
    ///
    /// let mut counter = MinMaxCounter::new();
    /// assert_eq!(counter.increment("k"), 1);
    /// assert_eq!(counter.increment("k"), 2);
    /// ```
    #[inline]
    pub fn increment(&mut self, key: K) -> u64 {
        #[cfg(feature = "metrics")]
        self.metrics.record_increment_call();

        let stepped = match self.index.get(&key) {
            Some(&node) => self.step_up(node),
            None => self.insert_new(key),
        };
        debug_assert!(stepped.is_some(), "increment hit a broken chain link");
        stepped.unwrap_or_default()
    }

    /// Increments every key in `keys`; returns the number of keys processed.
    pub fn increment_batch<I>(&mut self, keys: I) -> usize
    where
        I: IntoIterator<Item = K>,
    {
        let mut processed = 0;
        for key in keys {
            self.increment(key);
            processed += 1;
        }
        processed
    }

    /// Decreases `key`'s count by one.
    ///
    /// Returns `None` if the key is absent (a no-op) and `Some(new_count)`
    /// otherwise. Reaching 0 removes the key entirely.
    ///
    /// # Example
    ///
    /// ```
    /// use countkit::ds::MinMaxCounter;
    ///
    /// let mut counter = MinMaxCounter::new();
    /// counter.increment("k");
    /// counter.increment("k");
    ///
    /// assert_eq!(counter.decrement(&"k"), Some(1));
    /// assert_eq!(counter.decrement(&"k"), Some(0));
    /// assert_eq!(counter.decrement(&"k"), None);
    /// assert!(counter.is_empty());
    /// ```
    #[inline]
    pub fn decrement<Q>(&mut self, key: &Q) -> Option<u64>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        #[cfg(feature = "metrics")]
        self.metrics.record_decrement_call();

        let node = match self.index.get(key) {
            Some(&node) => node,
            None => {
                #[cfg(feature = "metrics")]
                self.metrics.record_decrement_miss();
                return None;
            },
        };

        let source = self.chain.bucket_of(node)?;
        let count = self.chain.count_of_bucket(source)?;

        if count == 1 {
            // Target is the virtual count-0 bucket: the key leaves.
            self.index.remove(key);
            let (_, from) = self.chain.remove_node(node)?;
            self.retire(from);
            #[cfg(feature = "metrics")]
            self.metrics.record_key_evicted();
            trace!("key evicted at count 0: slot={}", node.index());
            return Some(0);
        }

        let lower = count - 1;
        let target = match self.chain.bucket_for_count(lower) {
            Some(target) => target,
            None => {
                #[cfg(feature = "metrics")]
                self.metrics.record_bucket_created();
                self.chain.insert_bucket_before(source, lower)?
            },
        };
        self.chain.move_to_front(node, target)?;
        self.retire(source);
        Some(lower)
    }

    /// Decrements every key in `keys`; returns how many were present.
    pub fn decrement_batch<I>(&mut self, keys: I) -> usize
    where
        I: IntoIterator<Item = K>,
    {
        let mut present = 0;
        for key in keys {
            if self.decrement(&key).is_some() {
                present += 1;
            }
        }
        present
    }

    /// Returns `key`'s current count, or 0 if absent.
    #[inline]
    pub fn count<Q>(&self, key: &Q) -> u64
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        #[cfg(feature = "metrics")]
        (&self.metrics).record_count_call();

        let count = self
            .index
            .get(key)
            .and_then(|&node| self.chain.count_of(node));

        #[cfg(feature = "metrics")]
        if count.is_some() {
            (&self.metrics).record_count_hit();
        }

        count.unwrap_or(0)
    }

    /// Returns the key with the highest count together with that count.
    ///
    /// Among keys sharing the maximum, the one that reached it first wins.
    /// Returns `None` when empty.
    ///
    /// # Example
    ///
    /// ```
    /// use countkit::ds::MinMaxCounter;
    ///
    /// let mut counter = MinMaxCounter::new();
    /// counter.increment("early");
    /// counter.increment("late");
    /// assert_eq!(counter.max(), Some((&"early", 1)));
    /// ```
    #[inline]
    pub fn max(&self) -> Option<(&K, u64)> {
        #[cfg(feature = "metrics")]
        (&self.metrics).record_max_call();

        let bucket = self.chain.back()?;
        let node = self.chain.oldest(bucket)?;
        Some((self.chain.key(node)?, self.chain.count_of_bucket(bucket)?))
    }

    /// Returns the key with the lowest non-zero count together with that
    /// count.
    ///
    /// Among keys sharing the minimum, the one that reached it most recently
    /// wins. Returns `None` when empty.
    ///
    /// # Example
    ///
    /// ```
    /// use countkit::ds::MinMaxCounter;
    ///
    /// let mut counter = MinMaxCounter::new();
    /// counter.increment("early");
    /// counter.increment("late");
    /// assert_eq!(counter.min(), Some((&"late", 1)));
    /// ```
    #[inline]
    pub fn min(&self) -> Option<(&K, u64)> {
        #[cfg(feature = "metrics")]
        (&self.metrics).record_min_call();

        let bucket = self.chain.front()?;
        let node = self.chain.newest(bucket)?;
        Some((self.chain.key(node)?, self.chain.count_of_bucket(bucket)?))
    }

    /// Highest count present, if any.
    pub fn max_count(&self) -> Option<u64> {
        self.chain
            .back()
            .and_then(|bucket| self.chain.count_of_bucket(bucket))
    }

    /// Lowest non-zero count present, if any.
    pub fn min_count(&self) -> Option<u64> {
        self.chain
            .front()
            .and_then(|bucket| self.chain.count_of_bucket(bucket))
    }

    /// Removes `key` regardless of its count and returns that count.
    ///
    /// # Example
    ///
    /// ```
    /// use countkit::ds::MinMaxCounter;
    ///
    /// let mut counter = MinMaxCounter::new();
    /// counter.increment("k");
    /// counter.increment("k");
    /// assert_eq!(counter.remove(&"k"), Some(2));
    /// assert_eq!(counter.remove(&"k"), None);
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Option<u64>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        #[cfg(feature = "metrics")]
        self.metrics.record_remove_call();

        let node = self.index.remove(key)?;
        let count = self.chain.count_of(node)?;
        let (_, from) = self.chain.remove_node(node)?;
        self.retire(from);

        #[cfg(feature = "metrics")]
        self.metrics.record_remove_found();
        Some(count)
    }

    /// Removes and returns exactly the entry [`min`](Self::min) reports.
    ///
    /// # Example
    ///
    /// ```
    /// use countkit::ds::MinMaxCounter;
    ///
    /// let mut counter = MinMaxCounter::new();
    /// counter.increment("a");
    /// counter.increment("b");
    /// counter.increment("c");
    /// counter.increment("c");
    ///
    /// assert_eq!(counter.pop_min(), Some(("b", 1)));
    /// assert_eq!(counter.pop_min(), Some(("a", 1)));
    /// assert_eq!(counter.pop_min(), Some(("c", 2)));
    /// assert_eq!(counter.pop_min(), None);
    /// ```
    pub fn pop_min(&mut self) -> Option<(K, u64)> {
        #[cfg(feature = "metrics")]
        self.metrics.record_pop_min_call();

        let bucket = self.chain.front()?;
        let count = self.chain.count_of_bucket(bucket)?;
        let node = self.chain.newest(bucket)?;
        let (key, from) = self.chain.remove_node(node)?;
        self.index.remove(&key);
        self.retire(from);

        #[cfg(feature = "metrics")]
        self.metrics.record_pop_min_found();
        Some((key, count))
    }

    /// Walks counts from lowest to highest, yielding `(count, keys_at_count)`.
    ///
    /// O(number of distinct counts).
    ///
    /// # Example
    ///
    /// ```
    /// use countkit::ds::MinMaxCounter;
    ///
    /// let mut counter = MinMaxCounter::new();
    /// counter.increment_batch(["a", "b", "b", "c", "c", "c", "d", "d", "d"]);
    ///
    /// let histogram: Vec<_> = counter.iter_counts().collect();
    /// assert_eq!(histogram, vec![(1, 1), (2, 1), (3, 2)]);
    /// ```
    pub fn iter_counts(&self) -> BucketIter<'_, K> {
        self.chain.iter()
    }

    pub fn clear(&mut self) {
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();

        self.chain.clear();
        self.index.clear();
    }

    /// Clears all state and releases internal storage.
    pub fn clear_shrink(&mut self) {
        self.clear();
        self.chain.shrink_to_fit();
        self.index.shrink_to_fit();
    }

    /// Returns an approximate memory footprint in bytes.
    pub fn approx_bytes(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.chain.approx_bytes()
            + self.index.capacity() * std::mem::size_of::<(K, SlotId)>()
    }

    /// Checks chain ordering, bucket uniqueness, non-empty buckets and
    /// agreement between the key index and the chain.
    ///
    /// O(n). Meant for tests, fuzzing and debugging.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.chain.check_invariants()?;

        if self.index.len() != self.chain.len() {
            return Err(InvariantError::new(format!(
                "key index has {} keys but chain holds {} nodes",
                self.index.len(),
                self.chain.len()
            )));
        }
        for (key, &node) in &self.index {
            if self.chain.key(node) != Some(key) {
                return Err(InvariantError::new(format!(
                    "key index points at slot {} holding a different key",
                    node.index()
                )));
            }
        }
        Ok(())
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if let Err(err) = self.check_invariants() {
            panic!("MinMaxCounter invariant violated: {}", err);
        }
    }

    fn insert_new(&mut self, key: K) -> Option<u64> {
        let target = match self.chain.bucket_for_count(1) {
            Some(target) => target,
            None => {
                #[cfg(feature = "metrics")]
                self.metrics.record_bucket_created();
                // Nothing sorts below count 1, so the new bucket leads the chain.
                self.chain.insert_bucket_after(None, 1)?
            },
        };
        let node = self.chain.push_front(target, key.clone())?;
        self.index.insert(key, node);

        #[cfg(feature = "metrics")]
        self.metrics.record_key_created();
        trace!("key created: slot={}", node.index());
        Some(1)
    }

    fn step_up(&mut self, node: SlotId) -> Option<u64> {
        let source = self.chain.bucket_of(node)?;
        let count = self.chain.count_of_bucket(source)?;
        if count == u64::MAX {
            self.chain.move_to_front(node, source)?;
            return Some(count);
        }

        let higher = count + 1;
        let target = match self.chain.bucket_for_count(higher) {
            Some(target) => target,
            None => {
                #[cfg(feature = "metrics")]
                self.metrics.record_bucket_created();
                self.chain.insert_bucket_after(Some(source), higher)?
            },
        };
        self.chain.move_to_front(node, target)?;
        self.retire(source);
        Some(higher)
    }

    #[inline]
    fn retire(&mut self, bucket: SlotId) {
        if self.chain.retire_if_empty(bucket) {
            #[cfg(feature = "metrics")]
            self.metrics.record_bucket_retired();
        }
    }
}

impl<K> Default for MinMaxCounter<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> CountTracker<K> for MinMaxCounter<K>
where
    K: Eq + Hash + Clone,
{
    fn increment(&mut self, key: K) -> u64 {
        MinMaxCounter::increment(self, key)
    }

    fn decrement(&mut self, key: &K) -> Option<u64> {
        MinMaxCounter::decrement(self, key)
    }

    fn count(&self, key: &K) -> u64 {
        MinMaxCounter::count(self, key)
    }

    fn contains(&self, key: &K) -> bool {
        MinMaxCounter::contains(self, key)
    }

    fn max(&self) -> Option<(&K, u64)> {
        MinMaxCounter::max(self)
    }

    fn min(&self) -> Option<(&K, u64)> {
        MinMaxCounter::min(self)
    }

    fn remove(&mut self, key: &K) -> Option<u64> {
        MinMaxCounter::remove(self, key)
    }

    fn pop_min(&mut self) -> Option<(K, u64)> {
        MinMaxCounter::pop_min(self)
    }

    fn len(&self) -> usize {
        MinMaxCounter::len(self)
    }

    fn clear(&mut self) {
        MinMaxCounter::clear(self)
    }
}

impl<K> Extend<K> for MinMaxCounter<K>
where
    K: Eq + Hash + Clone,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        self.increment_batch(iter);
    }
}

impl<K> FromIterator<K> for MinMaxCounter<K>
where
    K: Eq + Hash + Clone,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut counter = Self::new();
        counter.increment_batch(iter);
        counter
    }
}

#[cfg(feature = "metrics")]
impl<K> MinMaxCounter<K>
where
    K: Eq + Hash + Clone,
{
    pub fn metrics_snapshot(&self) -> CounterMetricsSnapshot {
        self.metrics.snapshot(self.len(), self.bucket_count())
    }
}

#[cfg(feature = "metrics")]
impl<K> MetricsSnapshotProvider<CounterMetricsSnapshot> for MinMaxCounter<K>
where
    K: Eq + Hash + Clone,
{
    fn snapshot(&self) -> CounterMetricsSnapshot {
        self.metrics_snapshot()
    }
}

#[cfg(feature = "metrics")]
impl<K> MetricsReset for MinMaxCounter<K> {
    fn reset_metrics(&mut self) {
        self.metrics.reset();
    }
}

/// [`MinMaxCounter`] behind a single `parking_lot::RwLock`.
///
/// Mutations take the write lock, queries the read lock. A single lock keeps
/// `max`/`min` globally exact; sharding would make them approximate. Since
/// references cannot escape the guard, `max`, `min` and `pop_min` return
/// owned keys.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use std::thread;
/// use countkit::ds::ConcurrentMinMaxCounter;
///
/// let counter = Arc::new(ConcurrentMinMaxCounter::new());
///
/// let handles: Vec<_> = (0..4).map(|t| {
///     let counter = Arc::clone(&counter);
///     thread::spawn(move || {
///         for _ in 0..=t {
///             counter.increment(t);
///         }
///     })
/// }).collect();
///
/// for h in handles {
///     h.join().unwrap();
/// }
///
/// assert_eq!(counter.max(), Some((3, 4)));
/// assert_eq!(counter.min(), Some((0, 1)));
/// ```
#[cfg(feature = "concurrency")]
#[derive(Debug)]
pub struct ConcurrentMinMaxCounter<K> {
    inner: parking_lot::RwLock<MinMaxCounter<K>>,
}

#[cfg(feature = "concurrency")]
impl<K> ConcurrentMinMaxCounter<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::from_counter(MinMaxCounter::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_counter(MinMaxCounter::with_capacity(capacity))
    }

    pub fn with_capacity_and_bucket_hint(capacity: usize, bucket_hint: usize) -> Self {
        Self::from_counter(MinMaxCounter::with_capacity_and_bucket_hint(
            capacity,
            bucket_hint,
        ))
    }

    pub fn from_counter(counter: MinMaxCounter<K>) -> Self {
        Self {
            inner: parking_lot::RwLock::new(counter),
        }
    }

    pub fn into_inner(self) -> MinMaxCounter<K> {
        self.inner.into_inner()
    }

    pub fn increment(&self, key: K) -> u64 {
        let mut counter = self.inner.write();
        counter.increment(key)
    }

    pub fn decrement<Q>(&self, key: &Q) -> Option<u64>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut counter = self.inner.write();
        counter.decrement(key)
    }

    pub fn count<Q>(&self, key: &Q) -> u64
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let counter = self.inner.read();
        counter.count(key)
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let counter = self.inner.read();
        counter.contains(key)
    }

    pub fn max(&self) -> Option<(K, u64)> {
        let counter = self.inner.read();
        counter.max().map(|(key, count)| (key.clone(), count))
    }

    pub fn min(&self) -> Option<(K, u64)> {
        let counter = self.inner.read();
        counter.min().map(|(key, count)| (key.clone(), count))
    }

    pub fn remove<Q>(&self, key: &Q) -> Option<u64>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut counter = self.inner.write();
        counter.remove(key)
    }

    pub fn pop_min(&self) -> Option<(K, u64)> {
        let mut counter = self.inner.write();
        counter.pop_min()
    }

    pub fn len(&self) -> usize {
        let counter = self.inner.read();
        counter.len()
    }

    pub fn is_empty(&self) -> bool {
        let counter = self.inner.read();
        counter.is_empty()
    }

    pub fn bucket_count(&self) -> usize {
        let counter = self.inner.read();
        counter.bucket_count()
    }

    pub fn clear(&self) {
        let mut counter = self.inner.write();
        counter.clear();
    }

    /// Runs `f` under the read lock.
    pub fn with_read<R>(&self, f: impl FnOnce(&MinMaxCounter<K>) -> R) -> R {
        let counter = self.inner.read();
        f(&counter)
    }

    /// Runs `f` under the write lock, making compound updates atomic.
    ///
    /// # Example
    ///
    /// ```
    /// use countkit::ds::ConcurrentMinMaxCounter;
    ///
    /// let counter = ConcurrentMinMaxCounter::new();
    /// counter.increment("a");
    /// let moved = counter.with_write(|c| {
    ///     let n = c.remove(&"a").unwrap_or(0);
    ///     for _ in 0..n { c.increment("b"); }
    ///     n
    /// });
    /// assert_eq!(moved, 1);
    /// assert_eq!(counter.count(&"b"), 1);
    /// ```
    pub fn with_write<R>(&self, f: impl FnOnce(&mut MinMaxCounter<K>) -> R) -> R {
        let mut counter = self.inner.write();
        f(&mut counter)
    }

    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let counter = self.inner.read();
        counter.check_invariants()
    }

    #[cfg(feature = "metrics")]
    pub fn metrics_snapshot(&self) -> CounterMetricsSnapshot {
        let counter = self.inner.read();
        counter.metrics_snapshot()
    }
}

#[cfg(feature = "concurrency")]
impl<K> Default for ConcurrentMinMaxCounter<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "concurrency")]
impl<K> From<MinMaxCounter<K>> for ConcurrentMinMaxCounter<K>
where
    K: Eq + Hash + Clone,
{
    fn from(counter: MinMaxCounter<K>) -> Self {
        Self::from_counter(counter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_max_counter_empty_reports_nothing() {
        let counter: MinMaxCounter<&str> = MinMaxCounter::new();
        assert_eq!(counter.max(), None);
        assert_eq!(counter.min(), None);
        assert_eq!(counter.max_count(), None);
        assert_eq!(counter.min_count(), None);
        assert_eq!(counter.count(&"missing"), 0);
        counter.debug_validate_invariants();
    }

    #[test]
    fn min_max_counter_increment_then_decrement_empties() {
        let mut counter = MinMaxCounter::new();
        counter.increment("cat");
        counter.increment("dog");
        assert_eq!(counter.decrement(&"cat"), Some(0));
        assert_eq!(counter.decrement(&"dog"), Some(0));

        assert!(counter.is_empty());
        assert_eq!(counter.bucket_count(), 0);
        assert_eq!(counter.count(&"cat"), 0);
        assert_eq!(counter.max(), None);
        counter.debug_validate_invariants();
    }

    #[test]
    fn min_max_counter_max_and_min_follow_counts() {
        let mut counter = MinMaxCounter::new();
        for _ in 0..3 {
            counter.increment("foo");
        }
        for _ in 0..4 {
            counter.increment("bar");
        }
        assert_eq!(counter.max(), Some((&"bar", 4)));
        assert_eq!(counter.min(), Some((&"foo", 3)));

        counter.increment("foo");
        counter.increment("foo");
        assert_eq!(counter.max(), Some((&"foo", 5)));
        assert_eq!(counter.min(), Some((&"bar", 4)));
        counter.debug_validate_invariants();
    }

    #[test]
    fn min_max_counter_decrement_walks_back_down() {
        let mut counter = MinMaxCounter::new();
        for _ in 0..5 {
            counter.increment("foo");
        }
        for _ in 0..4 {
            counter.increment("bar");
        }

        for _ in 0..3 {
            counter.decrement(&"foo");
        }
        assert_eq!(counter.max(), Some((&"bar", 4)));
        assert_eq!(counter.min(), Some((&"foo", 2)));

        counter.decrement(&"foo");
        assert_eq!(counter.min(), Some((&"foo", 1)));

        counter.decrement(&"foo");
        assert_eq!(counter.max(), Some((&"bar", 4)));
        assert_eq!(counter.min(), Some((&"bar", 4)));
        assert!(!counter.contains(&"foo"));
        counter.debug_validate_invariants();
    }

    #[test]
    fn min_max_counter_decrement_missing_is_noop() {
        let mut counter: MinMaxCounter<&str> = MinMaxCounter::new();
        assert_eq!(counter.decrement(&"doesntexist"), None);
        assert_eq!(counter.count(&"doesntexist"), 0);
        assert!(counter.is_empty());
        counter.debug_validate_invariants();
    }

    #[test]
    fn min_max_counter_tie_break_is_asymmetric() {
        let mut counter = MinMaxCounter::new();
        for _ in 0..4 {
            counter.increment("bar");
        }
        for _ in 0..4 {
            counter.increment("baz");
        }
        // Both at 4: max favors the first to arrive, min the most recent.
        assert_eq!(counter.max(), Some((&"bar", 4)));
        assert_eq!(counter.min(), Some((&"baz", 4)));
    }

    #[test]
    fn min_max_counter_arrival_order_resets_on_move() {
        let mut counter = MinMaxCounter::new();
        counter.increment("a");
        counter.increment("b");
        counter.increment("a");
        counter.increment("b");
        counter.increment("a");
        counter.decrement(&"a");
        // "a" re-arrived at 2 after "b", so "b" is now the oldest at 2.
        assert_eq!(counter.max(), Some((&"b", 2)));
        assert_eq!(counter.min(), Some((&"a", 2)));
    }

    #[test]
    fn min_max_counter_gaps_in_counts_are_kept() {
        let mut counter = MinMaxCounter::new();
        counter.increment("low");
        for _ in 0..5 {
            counter.increment("mid");
        }
        for _ in 0..9 {
            counter.increment("high");
        }
        // "mid" and "high" each left behind empty buckets that were retired.
        let histogram: Vec<_> = counter.iter_counts().collect();
        assert_eq!(histogram, vec![(1, 1), (5, 1), (9, 1)]);
        assert_eq!(counter.min_count(), Some(1));
        assert_eq!(counter.max_count(), Some(9));
        counter.debug_validate_invariants();
    }

    #[test]
    fn min_max_counter_decrement_splices_before_source() {
        let mut counter = MinMaxCounter::new();
        counter.increment("a");
        for _ in 0..3 {
            counter.increment("b");
        }
        // Buckets {1, 3}; decrementing b creates 2 between them.
        assert_eq!(counter.decrement(&"b"), Some(2));
        let counts: Vec<u64> = counter.iter_counts().map(|(c, _)| c).collect();
        assert_eq!(counts, vec![1, 2]);
        counter.debug_validate_invariants();
    }

    #[test]
    fn min_max_counter_shared_bucket_survives_partial_move() {
        let mut counter = MinMaxCounter::new();
        counter.increment("a");
        counter.increment("b");
        counter.increment("a");
        assert_eq!(counter.bucket_count(), 2);
        assert_eq!(counter.count(&"a"), 2);
        assert_eq!(counter.count(&"b"), 1);
        counter.debug_validate_invariants();
    }

    #[test]
    fn min_max_counter_remove_and_pop_min() {
        let mut counter = MinMaxCounter::new();
        counter.increment("a");
        counter.increment("b");
        counter.increment("b");
        counter.increment("c");

        assert_eq!(counter.remove(&"b"), Some(2));
        assert_eq!(counter.remove(&"b"), None);
        assert_eq!(counter.bucket_count(), 1);

        assert_eq!(counter.pop_min(), Some(("c", 1)));
        assert_eq!(counter.pop_min(), Some(("a", 1)));
        assert_eq!(counter.pop_min(), None);
        counter.debug_validate_invariants();
    }

    #[test]
    fn min_max_counter_borrowed_lookups() {
        let mut counter: MinMaxCounter<String> = MinMaxCounter::new();
        counter.increment("alpha".to_string());
        counter.increment("alpha".to_string());

        assert!(counter.contains("alpha"));
        assert_eq!(counter.count("alpha"), 2);
        assert_eq!(counter.decrement("alpha"), Some(1));
        assert_eq!(counter.remove("alpha"), Some(1));
        assert!(counter.is_empty());
    }

    #[test]
    fn min_max_counter_saturates_at_u64_max() {
        let mut counter = MinMaxCounter::new();
        counter.increment("k");
        counter.increment("other");
        // Drive the node straight into a u64::MAX bucket.
        let node = counter.index[&"k"];
        let source = counter.chain.bucket_of(node).unwrap();
        let top = counter
            .chain
            .insert_bucket_after(counter.chain.back(), u64::MAX)
            .unwrap();
        counter.chain.move_to_front(node, top).unwrap();
        counter.chain.retire_if_empty(source);
        counter.debug_validate_invariants();

        assert_eq!(counter.increment("k"), u64::MAX);
        assert_eq!(counter.count(&"k"), u64::MAX);
        assert_eq!(counter.max(), Some((&"k", u64::MAX)));
        counter.debug_validate_invariants();
    }

    #[test]
    fn min_max_counter_clear_resets_state() {
        let mut counter = MinMaxCounter::with_capacity(16);
        counter.increment_batch(["a", "b", "b"]);
        counter.clear();
        assert!(counter.is_empty());
        assert_eq!(counter.bucket_count(), 0);
        assert_eq!(counter.min(), None);

        counter.increment("a");
        assert_eq!(counter.min(), Some((&"a", 1)));
        counter.clear_shrink();
        assert!(counter.is_empty());
        counter.debug_validate_invariants();
    }

    #[test]
    fn min_max_counter_batches_report_processed() {
        let mut counter = MinMaxCounter::new();
        assert_eq!(counter.increment_batch(["a", "b", "a"]), 3);
        assert_eq!(counter.decrement_batch(["a", "missing", "b"]), 2);
        assert_eq!(counter.count(&"a"), 1);
        assert!(!counter.contains(&"b"));
    }

    #[test]
    fn min_max_counter_from_iterator_counts_duplicates() {
        let counter: MinMaxCounter<char> = "mississippi".chars().collect();
        assert_eq!(counter.count(&'s'), 4);
        assert_eq!(counter.count(&'i'), 4);
        assert_eq!(counter.count(&'p'), 2);
        assert_eq!(counter.count(&'m'), 1);
        // 's' reached 4 before 'i' did.
        assert_eq!(counter.max(), Some((&'s', 4)));
        assert_eq!(counter.min(), Some((&'m', 1)));
    }

    #[test]
    fn min_max_counter_instances_are_independent() {
        let mut a = MinMaxCounter::new();
        let b: MinMaxCounter<&str> = MinMaxCounter::new();
        a.increment("x");
        assert_eq!(a.count(&"x"), 1);
        assert_eq!(b.count(&"x"), 0);
    }

    #[test]
    fn min_max_counter_approx_bytes_nonzero() {
        let counter: MinMaxCounter<u64> = MinMaxCounter::new();
        assert!(counter.approx_bytes() > 0);
    }

    #[test]
    fn min_max_counter_through_trait() {
        fn bump<T: CountTracker<&'static str>>(tracker: &mut T) -> Option<(&'static str, u64)> {
            tracker.increment("x");
            tracker.increment("x");
            tracker.increment("y");
            tracker.min().map(|(k, c)| (*k, c))
        }

        let mut counter = MinMaxCounter::new();
        assert_eq!(bump(&mut counter), Some(("y", 1)));
        assert_eq!(CountTracker::len(&counter), 2);
        assert!(!CountTracker::is_empty(&counter));
    }

    #[cfg(feature = "metrics")]
    #[test]
    fn min_max_counter_metrics_track_operations() {
        let mut counter = MinMaxCounter::new();
        counter.increment("a");
        counter.increment("a");
        counter.decrement(&"missing");
        counter.decrement(&"a");
        counter.decrement(&"a");
        counter.count(&"a");
        counter.max();
        counter.min();

        let snap = counter.metrics_snapshot();
        assert_eq!(snap.increment_calls, 2);
        assert_eq!(snap.keys_created, 1);
        assert_eq!(snap.decrement_calls, 3);
        assert_eq!(snap.decrement_misses, 1);
        assert_eq!(snap.keys_evicted, 1);
        // 1 created, 2 created, 1 retired, 1 created, 2 retired, 1 retired
        assert_eq!(snap.buckets_created, 3);
        assert_eq!(snap.buckets_retired, 3);
        assert_eq!(snap.count_calls, 1);
        assert_eq!(snap.count_hits, 0);
        assert_eq!(snap.max_calls, 1);
        assert_eq!(snap.min_calls, 1);
        assert_eq!(snap.len, 0);

        counter.reset_metrics();
        assert_eq!(counter.snapshot().increment_calls, 0);
    }

    #[cfg(feature = "concurrency")]
    #[test]
    fn concurrent_min_max_counter_basic_ops() {
        let counter = ConcurrentMinMaxCounter::new();
        counter.increment("a");
        counter.increment("a");
        counter.increment("b");

        assert_eq!(counter.count(&"a"), 2);
        assert_eq!(counter.max(), Some(("a", 2)));
        assert_eq!(counter.min(), Some(("b", 1)));
        assert_eq!(counter.len(), 2);
        assert_eq!(counter.bucket_count(), 2);

        assert_eq!(counter.pop_min(), Some(("b", 1)));
        assert_eq!(counter.decrement(&"a"), Some(1));
        assert_eq!(counter.remove(&"a"), Some(1));
        assert!(counter.is_empty());
        counter.check_invariants().unwrap();

        let inner = counter.into_inner();
        assert!(inner.is_empty());
    }
}
