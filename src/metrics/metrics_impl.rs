use crate::metrics::cell::MetricsCell;
use crate::metrics::snapshot::CounterMetricsSnapshot;
use crate::metrics::traits::{CounterMetricsReadRecorder, CounterMetricsRecorder};

#[derive(Debug, Default)]
pub struct CounterMetrics {
    pub increment_calls: u64,
    pub keys_created: u64,
    pub decrement_calls: u64,
    pub decrement_misses: u64,
    pub keys_evicted: u64,
    pub buckets_created: u64,
    pub buckets_retired: u64,
    pub remove_calls: u64,
    pub remove_found: u64,
    pub pop_min_calls: u64,
    pub pop_min_found: u64,
    pub clear_calls: u64,
    pub count_calls: MetricsCell,
    pub count_hits: MetricsCell,
    pub max_calls: MetricsCell,
    pub min_calls: MetricsCell,
}

impl CounterMetrics {
    /// Copies the counters and attaches the gauges captured by the caller.
    pub fn snapshot(&self, len: usize, bucket_count: usize) -> CounterMetricsSnapshot {
        CounterMetricsSnapshot {
            increment_calls: self.increment_calls,
            keys_created: self.keys_created,
            decrement_calls: self.decrement_calls,
            decrement_misses: self.decrement_misses,
            keys_evicted: self.keys_evicted,
            buckets_created: self.buckets_created,
            buckets_retired: self.buckets_retired,
            remove_calls: self.remove_calls,
            remove_found: self.remove_found,
            pop_min_calls: self.pop_min_calls,
            pop_min_found: self.pop_min_found,
            clear_calls: self.clear_calls,
            count_calls: self.count_calls.get(),
            count_hits: self.count_hits.get(),
            max_calls: self.max_calls.get(),
            min_calls: self.min_calls.get(),
            len,
            bucket_count,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl CounterMetricsRecorder for CounterMetrics {
    fn record_increment_call(&mut self) {
        self.increment_calls += 1;
    }

    fn record_key_created(&mut self) {
        self.keys_created += 1;
    }

    fn record_decrement_call(&mut self) {
        self.decrement_calls += 1;
    }

    fn record_decrement_miss(&mut self) {
        self.decrement_misses += 1;
    }

    fn record_key_evicted(&mut self) {
        self.keys_evicted += 1;
    }

    fn record_bucket_created(&mut self) {
        self.buckets_created += 1;
    }

    fn record_bucket_retired(&mut self) {
        self.buckets_retired += 1;
    }

    fn record_remove_call(&mut self) {
        self.remove_calls += 1;
    }

    fn record_remove_found(&mut self) {
        self.remove_found += 1;
    }

    fn record_pop_min_call(&mut self) {
        self.pop_min_calls += 1;
    }

    fn record_pop_min_found(&mut self) {
        self.pop_min_found += 1;
    }

    fn record_clear(&mut self) {
        self.clear_calls += 1;
    }
}

impl CounterMetricsReadRecorder for &CounterMetrics {
    fn record_count_call(&self) {
        self.count_calls.incr();
    }

    fn record_count_hit(&self) {
        self.count_hits.incr();
    }

    fn record_max_call(&self) {
        self.max_calls.incr();
    }

    fn record_min_call(&self) {
        self.min_calls.incr();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_metrics_snapshot_copies_fields() {
        let mut metrics = CounterMetrics::default();
        metrics.record_increment_call();
        metrics.record_key_created();
        metrics.record_bucket_created();
        (&metrics).record_count_call();
        (&metrics).record_max_call();

        let snap = metrics.snapshot(1, 1);
        assert_eq!(snap.increment_calls, 1);
        assert_eq!(snap.keys_created, 1);
        assert_eq!(snap.buckets_created, 1);
        assert_eq!(snap.count_calls, 1);
        assert_eq!(snap.count_hits, 0);
        assert_eq!(snap.max_calls, 1);
        assert_eq!(snap.len, 1);
        assert_eq!(snap.bucket_count, 1);
    }

    #[test]
    fn counter_metrics_reset_zeroes_everything() {
        let mut metrics = CounterMetrics::default();
        metrics.record_decrement_call();
        metrics.record_decrement_miss();
        (&metrics).record_min_call();
        metrics.reset();

        let snap = metrics.snapshot(0, 0);
        assert_eq!(snap.decrement_calls, 0);
        assert_eq!(snap.decrement_misses, 0);
        assert_eq!(snap.min_calls, 0);
    }
}
