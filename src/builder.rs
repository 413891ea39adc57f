//! Builder for counters and counter-backed caches.
//!
//! Collects the sizing hints once and hands out the concrete types.
//!
//! ## Example
//!
//! ```rust
//! use countkit::builder::CounterBuilder;
//!
//! let mut counter = CounterBuilder::new()
//!     .capacity(1_000)
//!     .bucket_hint(64)
//!     .build::<&str>();
//! counter.increment("hello");
//! assert_eq!(counter.count("hello"), 1);
//!
//! let mut cache = CounterBuilder::new().capacity(2).build_cache::<u64, String>();
//! cache.insert(1, "one".to_string());
//! assert_eq!(cache.get(&1), Some(&"one".to_string()));
//! ```

use std::hash::Hash;

#[cfg(feature = "concurrency")]
use crate::ds::ConcurrentMinMaxCounter;
use crate::ds::bucket_chain::DEFAULT_BUCKET_PREALLOC;
use crate::ds::MinMaxCounter;
use crate::error::ConfigError;
use crate::policy::lfu::LfuCache;

/// Builder for [`MinMaxCounter`], its concurrent wrapper and [`LfuCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterBuilder {
    capacity: usize,
    bucket_hint: usize,
}

impl CounterBuilder {
    /// Starts with no key pre-allocation and [`DEFAULT_BUCKET_PREALLOC`]
    /// buckets.
    pub fn new() -> Self {
        Self {
            capacity: 0,
            bucket_hint: DEFAULT_BUCKET_PREALLOC,
        }
    }

    /// Expected number of distinct keys. Doubles as the cache bound for
    /// [`build_cache`](Self::build_cache).
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Expected number of distinct counts alive at once.
    pub fn bucket_hint(mut self, bucket_hint: usize) -> Self {
        self.bucket_hint = bucket_hint;
        self
    }

    pub fn build<K>(self) -> MinMaxCounter<K>
    where
        K: Eq + Hash + Clone,
    {
        MinMaxCounter::with_capacity_and_bucket_hint(self.capacity, self.bucket_hint)
    }

    #[cfg(feature = "concurrency")]
    pub fn build_concurrent<K>(self) -> ConcurrentMinMaxCounter<K>
    where
        K: Eq + Hash + Clone,
    {
        ConcurrentMinMaxCounter::with_capacity_and_bucket_hint(self.capacity, self.bucket_hint)
    }

    /// Builds an LFU cache bounded by the configured capacity.
    ///
    /// A capacity of 0 yields a cache that rejects every insert; use
    /// [`try_build_cache`](Self::try_build_cache) to reject it up front.
    pub fn build_cache<K, V>(self) -> LfuCache<K, V>
    where
        K: Eq + Hash + Clone,
    {
        LfuCache::with_bucket_hint(self.capacity, self.bucket_hint)
    }

    pub fn try_build_cache<K, V>(self) -> Result<LfuCache<K, V>, ConfigError>
    where
        K: Eq + Hash + Clone,
    {
        if self.capacity == 0 {
            return Err(ConfigError::new("capacity must be > 0"));
        }
        Ok(self.build_cache())
    }
}

impl Default for CounterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
