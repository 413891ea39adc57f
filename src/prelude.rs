pub use crate::builder::CounterBuilder;
pub use crate::ds::{BucketChain, MinMaxCounter, SlotArena, SlotId};
#[cfg(feature = "concurrency")]
pub use crate::ds::ConcurrentMinMaxCounter;
pub use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::CounterMetricsSnapshot;
pub use crate::policy::lfu::LfuCache;
pub use crate::traits::CountTracker;
