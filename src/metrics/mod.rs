//! Operation counters for [`MinMaxCounter`](crate::ds::MinMaxCounter).
//!
//! Enabled with the `metrics` feature.

pub mod cell;
pub mod exporter;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;
