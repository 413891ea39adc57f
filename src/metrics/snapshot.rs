#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CounterMetricsSnapshot {
    pub increment_calls: u64,
    pub keys_created: u64,

    pub decrement_calls: u64,
    pub decrement_misses: u64, // decrements of keys that were not tracked
    pub keys_evicted: u64,     // keys that reached count 0

    pub buckets_created: u64,
    pub buckets_retired: u64,

    pub remove_calls: u64,
    pub remove_found: u64,
    pub pop_min_calls: u64,
    pub pop_min_found: u64,
    pub clear_calls: u64,

    pub count_calls: u64,
    pub count_hits: u64,
    pub max_calls: u64,
    pub min_calls: u64,

    // gauges captured at snapshot time
    pub len: usize,
    pub bucket_count: usize,
}
