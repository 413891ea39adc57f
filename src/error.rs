//! Error types for the countkit library.
//!
//! Core counter operations are total and never fail. Errors only show up at
//! the edges:
//!
//! - [`InvariantError`]: returned by `check_invariants` when the bucket chain
//!   and its indexes disagree.
//! - [`ConfigError`]: returned by fallible constructors when a parameter is
//!   out of range (e.g. a zero-capacity cache).
//!
//! ## Example Usage
//!
//! ```
//! use countkit::error::ConfigError;
//! use countkit::policy::lfu::LfuCache;
//!
//! let cache: Result<LfuCache<u64, &str>, ConfigError> = LfuCache::try_new(8);
//! assert!(cache.is_ok());
//!
//! let bad = LfuCache::<u64, &str>::try_new(0);
//! assert!(bad.is_err());
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// A structural invariant of the counter was found broken.
///
/// Produced by [`MinMaxCounter::check_invariants`](crate::ds::MinMaxCounter::check_invariants)
/// and [`BucketChain::check_invariants`](crate::ds::BucketChain::check_invariants).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// A construction parameter failed validation.
///
/// Produced by [`LfuCache::try_new`](crate::policy::lfu::LfuCache::try_new)
/// and [`CounterBuilder::try_build_cache`](crate::builder::CounterBuilder::try_build_cache).
///
/// # Example
///
/// ```
/// use countkit::policy::lfu::LfuCache;
///
/// let err = LfuCache::<u64, u64>::try_new(0).unwrap_err();
/// assert!(err.to_string().contains("capacity"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}
