//! # LFU Cache on a MinMaxCounter
//!
//! A bounded key/value cache that delegates all frequency bookkeeping to a
//! [`CountTracker`] (by default [`MinMaxCounter`]). Values live in a plain
//! hash map; the tracker decides who leaves.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────┐
//!   │                       LfuCache<K, V, T>                          │
//!   │                                                                  │
//!   │   values: FxHashMap<K, V>        tracker: T (MinMaxCounter<K>)   │
//!   │   ┌─────────┬─────────┐          count 1: [page_3, page_9]       │
//!   │   │ page_1  │  ...    │          count 3: [page_2]               │
//!   │   │ page_2  │  ...    │          count 7: [page_1]               │
//!   │   │ page_3  │  ...    │                                          │
//!   │   └─────────┴─────────┘          victim = tracker.min()          │
//!   │                                   (newest key at lowest count)   │
//!   │   capacity: usize                                                │
//!   └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Eviction Order
//!
//! The victim is the key with the lowest access count. When several keys
//! share it, the one that reached that count most recently goes first, so a
//! key that was just admitted does not push out an older peer at the same
//! count.
//!
//! ## Example Usage
//!
//! ```
//! use countkit::policy::lfu::LfuCache;
//!
//! let mut cache = LfuCache::new(2);
//! cache.insert("a", "alpha");
//! cache.insert("b", "beta");
//!
//! cache.get(&"a");               // "a" now at count 2
//! cache.insert("c", "gamma");    // evicts "b" (count 1)
//!
//! assert!(cache.contains(&"a"));
//! assert!(!cache.contains(&"b"));
//! assert!(cache.contains(&"c"));
//! ```

use std::hash::Hash;

use log::debug;
use rustc_hash::FxHashMap;

use crate::ds::bucket_chain::DEFAULT_BUCKET_PREALLOC;
use crate::ds::min_max_counter::MinMaxCounter;
use crate::error::{ConfigError, InvariantError};
use crate::traits::CountTracker;

/// Bounded LFU cache.
///
/// # Type Parameters
///
/// - `K`: Key type, `Eq + Hash + Clone`
/// - `V`: Value type
/// - `T`: Frequency tracker, defaults to [`MinMaxCounter<K>`]
#[derive(Debug)]
pub struct LfuCache<K, V, T = MinMaxCounter<K>> {
    values: FxHashMap<K, V>,
    tracker: T,
    capacity: usize,
}

impl<K, V> LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// A capacity of 0 is honored: every insert is rejected.
    pub fn new(capacity: usize) -> Self {
        Self::with_bucket_hint(capacity, DEFAULT_BUCKET_PREALLOC)
    }

    /// Like [`new`](Self::new) but rejects a zero capacity.
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::new("capacity must be > 0"));
        }
        Ok(Self::new(capacity))
    }

    /// Creates a cache whose tracker pre-allocates `bucket_hint` counts.
    pub fn with_bucket_hint(capacity: usize, bucket_hint: usize) -> Self {
        Self::with_tracker(
            capacity,
            MinMaxCounter::with_capacity_and_bucket_hint(capacity, bucket_hint),
        )
    }
}

impl<K, V, T> LfuCache<K, V, T>
where
    K: Eq + Hash + Clone,
    T: CountTracker<K>,
{
    /// Builds a cache around an existing, empty tracker.
    pub fn with_tracker(capacity: usize, mut tracker: T) -> Self {
        tracker.clear();
        Self {
            values: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            tracker,
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.values.contains_key(key)
    }

    /// Inserts or replaces `key`. Returns the previous value on replace.
    ///
    /// Replacing counts as an access. A new key may first evict the current
    /// LFU victim, then enters at count 1.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(slot) = self.values.get_mut(&key) {
            let old = std::mem::replace(slot, value);
            self.tracker.increment(key);
            return Some(old);
        }

        if self.capacity == 0 {
            return None;
        }

        if self.values.len() >= self.capacity {
            if let Some((victim, count)) = self.tracker.pop_min() {
                self.values.remove(&victim);
                debug!("lfu evicted entry at count {}", count);
            }
        }

        self.tracker.increment(key.clone());
        self.values.insert(key, value);
        None
    }

    /// Returns the value for `key` and counts the access.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        if !self.values.contains_key(key) {
            return None;
        }
        self.tracker.increment(key.clone());
        self.values.get(key)
    }

    /// Returns the value for `key` without counting an access.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.values.get(key)
    }

    /// Access count for `key`, `None` if not cached.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        if !self.values.contains_key(key) {
            return None;
        }
        Some(self.tracker.count(key))
    }

    /// The entry the next eviction would remove.
    pub fn peek_lfu(&self) -> Option<(&K, &V)> {
        let (key, _) = self.tracker.min()?;
        self.values.get_key_value(key)
    }

    /// The most frequently accessed entry (oldest among ties).
    pub fn peek_mfu(&self) -> Option<(&K, &V)> {
        let (key, _) = self.tracker.max()?;
        self.values.get_key_value(key)
    }

    /// Removes and returns the LFU victim.
    pub fn pop_lfu(&mut self) -> Option<(K, V)> {
        let (key, _) = self.tracker.pop_min()?;
        let value = self.values.remove(&key)?;
        Some((key, value))
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.tracker.remove(key);
        self.values.remove(key)
    }

    pub fn clear(&mut self) {
        debug!("lfu cleared {} entries", self.values.len());
        self.values.clear();
        self.tracker.clear();
    }

    /// Verifies that every cached key is tracked and vice versa.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.values.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "{} entries exceed capacity {}",
                self.values.len(),
                self.capacity
            )));
        }
        if self.values.len() != self.tracker.len() {
            return Err(InvariantError::new(format!(
                "{} values but {} tracked keys",
                self.values.len(),
                self.tracker.len()
            )));
        }
        if self.values.keys().any(|key| !self.tracker.contains(key)) {
            return Err(InvariantError::new("cached key missing from tracker"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod basic_behavior {
        use super::*;

        #[test]
        fn insert_get_and_replace() {
            let mut cache = LfuCache::new(3);
            assert_eq!(cache.insert(1, "one"), None);
            assert_eq!(cache.get(&1), Some(&"one"));
            assert_eq!(cache.frequency(&1), Some(2));

            assert_eq!(cache.insert(1, "uno"), Some("one"));
            assert_eq!(cache.peek(&1), Some(&"uno"));
            assert_eq!(cache.frequency(&1), Some(3));
            assert_eq!(cache.len(), 1);
            cache.check_invariants().unwrap();
        }

        #[test]
        fn get_missing_does_not_track() {
            let mut cache: LfuCache<u32, u32> = LfuCache::new(2);
            assert_eq!(cache.get(&5), None);
            assert_eq!(cache.frequency(&5), None);
            assert!(cache.is_empty());
            cache.check_invariants().unwrap();
        }

        #[test]
        fn peek_does_not_count() {
            let mut cache = LfuCache::new(2);
            cache.insert("k", 1);
            cache.peek(&"k");
            cache.peek(&"k");
            assert_eq!(cache.frequency(&"k"), Some(1));
        }
    }

    mod eviction {
        use super::*;

        #[test]
        fn evicts_lowest_count() {
            let mut cache = LfuCache::new(2);
            cache.insert("a", 1);
            cache.insert("b", 2);
            cache.get(&"a");
            cache.insert("c", 3);

            assert!(cache.contains(&"a"));
            assert!(!cache.contains(&"b"));
            assert!(cache.contains(&"c"));
            cache.check_invariants().unwrap();
        }

        #[test]
        fn ties_evict_most_recent_arrival() {
            let mut cache = LfuCache::new(3);
            cache.insert("a", 1);
            cache.insert("b", 2);
            cache.insert("c", 3);

            assert_eq!(cache.peek_lfu(), Some((&"c", &3)));
            assert_eq!(cache.pop_lfu(), Some(("c", 3)));
            assert_eq!(cache.pop_lfu(), Some(("b", 2)));
            assert_eq!(cache.len(), 1);
            cache.check_invariants().unwrap();
        }

        #[test]
        fn hot_key_survives_churn() {
            let mut cache = LfuCache::new(3);
            cache.insert("hot", 0);
            for _ in 0..50 {
                cache.get(&"hot");
            }
            for i in 0..20 {
                cache.insert(if i % 2 == 0 { "x" } else { "y" }, i);
                cache.insert("z", i);
            }
            assert!(cache.contains(&"hot"));
            assert_eq!(cache.peek_mfu().map(|(k, _)| *k), Some("hot"));
            cache.check_invariants().unwrap();
        }

        #[test]
        fn zero_capacity_rejects_inserts() {
            let mut cache: LfuCache<&str, i32> = LfuCache::new(0);
            assert_eq!(cache.capacity(), 0);
            assert_eq!(cache.insert("key", 42), None);
            assert_eq!(cache.len(), 0);
            cache.check_invariants().unwrap();
        }

        #[test]
        fn try_new_rejects_zero_capacity() {
            let err = LfuCache::<u8, u8>::try_new(0).unwrap_err();
            assert_eq!(err.message(), "capacity must be > 0");
            assert!(LfuCache::<u8, u8>::try_new(1).is_ok());
        }
    }

    mod state {
        use super::*;

        #[test]
        fn remove_and_clear_keep_tracker_in_sync() {
            let mut cache = LfuCache::new(4);
            cache.insert(1, 'a');
            cache.insert(2, 'b');
            cache.get(&2);

            assert_eq!(cache.remove(&2), Some('b'));
            assert_eq!(cache.remove(&2), None);
            assert_eq!(cache.frequency(&2), None);
            cache.check_invariants().unwrap();

            cache.clear();
            assert!(cache.is_empty());
            assert_eq!(cache.peek_lfu(), None);
            cache.check_invariants().unwrap();
        }

        #[test]
        fn with_tracker_starts_empty() {
            let mut tracker = MinMaxCounter::new();
            tracker.increment(99u32);
            let cache: LfuCache<u32, ()> = LfuCache::with_tracker(4, tracker);
            assert!(cache.is_empty());
            cache.check_invariants().unwrap();
        }
    }
}
