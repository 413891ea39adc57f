pub mod bucket_chain;
pub mod min_max_counter;
pub mod slot_arena;

pub use bucket_chain::{BucketChain, BucketIter, DEFAULT_BUCKET_PREALLOC};
#[cfg(feature = "concurrency")]
pub use min_max_counter::ConcurrentMinMaxCounter;
pub use min_max_counter::MinMaxCounter;
pub use slot_arena::{SlotArena, SlotId};
