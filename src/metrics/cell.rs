use std::sync::atomic::{AtomicU64, Ordering};

/// A metrics-only counter for `&self` read paths.
///
/// Relaxed atomics are enough: counters are observational and never used to
/// order other memory. This keeps the owning counter `Sync`, so it can sit
/// behind a read lock shared by many threads.
#[repr(transparent)]
#[derive(Debug, Default)]
pub struct MetricsCell(AtomicU64);

impl MetricsCell {
    #[inline]
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    #[inline]
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn incr(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn reset(&self) {
        self.0.store(0, Ordering::Relaxed);
    }
}
