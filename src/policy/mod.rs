//! Cache policies driven by a frequency tracker.

pub mod lfu;
