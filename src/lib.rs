//! countkit: O(1) key-frequency counting with global min/max queries.
//!
//! The core type is [`MinMaxCounter`](ds::MinMaxCounter). An LFU cache built
//! on it lives in [`policy::lfu`].

pub mod builder;
pub mod ds;
pub mod error;
pub mod policy;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod prelude;
pub mod traits;
