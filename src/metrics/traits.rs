//! # Metrics Trait Hierarchy
//!
//! Splits *recording*, *snapshotting* and *export* into small traits so the
//! counter's hot path only ever writes plain integers.
//!
//! ```text
//!   ┌───────────────────────────────┐   ┌───────────────────────────────┐
//!   │   CounterMetricsRecorder      │   │  CounterMetricsReadRecorder   │
//!   │   (&mut self: increment,      │   │  (&self: count/max/min)       │
//!   │    decrement, buckets, ...)   │   │                               │
//!   └───────────────┬───────────────┘   └───────────────┬───────────────┘
//!                   └──────────────┬────────────────────┘
//!                                  ▼
//!                        ┌───────────────────┐
//!                        │  CounterMetrics   │
//!                        └─────────┬─────────┘
//!                                  │ snapshot()
//!                                  ▼
//!   ┌──────────────────────────────┐    ┌──────────────────────────────┐
//!   │ MetricsSnapshotProvider<S>   │    │ MetricsExporter<S>           │
//!   │ (bench/test)                 │    │ (production monitoring)      │
//!   └──────────────────────────────┘    └──────────────────────────────┘
//! ```

/// Counters written by mutating operations.
pub trait CounterMetricsRecorder {
    fn record_increment_call(&mut self);
    fn record_key_created(&mut self);
    fn record_decrement_call(&mut self);
    fn record_decrement_miss(&mut self);
    fn record_key_evicted(&mut self);
    fn record_bucket_created(&mut self);
    fn record_bucket_retired(&mut self);
    fn record_remove_call(&mut self);
    fn record_remove_found(&mut self);
    fn record_pop_min_call(&mut self);
    fn record_pop_min_found(&mut self);
    fn record_clear(&mut self);
}

/// Counters written by `&self` queries (uses interior mutability).
pub trait CounterMetricsReadRecorder {
    fn record_count_call(&self);
    fn record_count_hit(&self);
    fn record_max_call(&self);
    fn record_min_call(&self);
}

/// Snapshot provider for bench/testing.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}

/// Reset metrics between tests or benchmark iterations.
pub trait MetricsReset {
    fn reset_metrics(&mut self);
}

/// Export/publish metrics to production monitoring backends.
pub trait MetricsExporter<S> {
    fn export(&self, snapshot: &S);
}
