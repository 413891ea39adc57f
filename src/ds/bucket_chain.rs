//! Count-ordered chain of buckets for O(1) frequency tracking.
//!
//! The chain is the storage layer underneath [`MinMaxCounter`]. It owns
//! every bucket and every key node, and keeps the count index in sync with
//! the links. It knows nothing about which key maps to which node; that
//! index lives one level up.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         BucketChain<K> Layout                           │
//! │                                                                         │
//! │   by_count: FxHashMap<u64, SlotId>      buckets: SlotArena<Bucket>      │
//! │   ┌───────┬────────┐                                                    │
//! │   │ count │ bucket │   front                                 back       │
//! │   ├───────┼────────┤     │                                     │        │
//! │   │   1   │  b_0   │     ▼                                     ▼        │
//! │   │   3   │  b_2   │  ┌──────┐  next   ┌──────┐  next   ┌──────┐       │
//! │   │   4   │  b_1   │  │ c=1  │ ──────► │ c=3  │ ──────► │ c=4  │       │
//! │   └───────┴────────┘  │ b_0  │ ◄────── │ b_2  │ ◄────── │ b_1  │       │
//! │                       └──┬───┘  prev   └──┬───┘  prev   └──┬───┘       │
//! │                          │ head           │ head           │ head      │
//! │                          ▼                ▼                ▼           │
//! │   nodes: SlotArena<Node<K>>                                             │
//! │                       [n_5]◄►[n_0]     [n_2]           [n_3]◄►[n_1]     │
//! │                       newest  oldest                   newest  oldest   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//!
//! - Counts strictly increase from `front` to `back`.
//! - `by_count` holds exactly one entry per live bucket.
//! - No live bucket is empty; [`BucketChain::retire_if_empty`] frees a bucket
//!   as soon as its last node leaves.
//! - Count 0 is never stored.
//!
//! [`MinMaxCounter`]: crate::ds::MinMaxCounter

use log::trace;
use rustc_hash::FxHashMap;

use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::error::InvariantError;

/// Default bucket pre-allocation for typical count distributions.
/// Most keys cluster at low counts, so 32 buckets covers the common case.
pub const DEFAULT_BUCKET_PREALLOC: usize = 32;

/// Key node. Link fields come first since they are touched on every move.
#[derive(Debug)]
#[repr(C)]
struct Node<K> {
    prev: Option<SlotId>,
    next: Option<SlotId>,
    bucket: SlotId,
    key: K,
}

#[derive(Debug)]
struct Bucket {
    prev: Option<SlotId>,
    next: Option<SlotId>,
    head: Option<SlotId>,
    tail: Option<SlotId>,
    count: u64,
    len: usize,
}

/// Doubly-linked chain of count buckets backed by slot arenas.
///
/// Bucket and node handles are plain [`SlotId`]s. A handle stays valid until
/// the bucket is retired or the node is removed.
#[derive(Debug)]
pub struct BucketChain<K> {
    nodes: SlotArena<Node<K>>,
    buckets: SlotArena<Bucket>,
    by_count: FxHashMap<u64, SlotId>,
    front: Option<SlotId>,
    back: Option<SlotId>,
}

impl<K> BucketChain<K> {
    pub fn new() -> Self {
        Self {
            nodes: SlotArena::new(),
            buckets: SlotArena::new(),
            by_count: FxHashMap::default(),
            front: None,
            back: None,
        }
    }

    /// Creates an empty chain with room for `capacity` nodes and
    /// `bucket_hint` distinct counts.
    pub fn with_capacity(capacity: usize, bucket_hint: usize) -> Self {
        Self {
            nodes: SlotArena::with_capacity(capacity),
            buckets: SlotArena::with_capacity(bucket_hint),
            by_count: FxHashMap::with_capacity_and_hasher(bucket_hint, Default::default()),
            front: None,
            back: None,
        }
    }

    /// Number of key nodes across all buckets.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of live buckets (distinct counts).
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Looks up the bucket holding exactly `count`.
    #[inline]
    pub fn bucket_for_count(&self, count: u64) -> Option<SlotId> {
        self.by_count.get(&count).copied()
    }

    /// Lowest-count bucket.
    #[inline]
    pub fn front(&self) -> Option<SlotId> {
        self.front
    }

    /// Highest-count bucket.
    #[inline]
    pub fn back(&self) -> Option<SlotId> {
        self.back
    }

    #[inline]
    pub fn count_of_bucket(&self, bucket: SlotId) -> Option<u64> {
        self.buckets.get(bucket).map(|b| b.count)
    }

    #[inline]
    pub fn bucket_len(&self, bucket: SlotId) -> usize {
        self.buckets.get(bucket).map(|b| b.len).unwrap_or(0)
    }

    /// Most recent arrival in `bucket`.
    #[inline]
    pub fn newest(&self, bucket: SlotId) -> Option<SlotId> {
        self.buckets.get(bucket)?.head
    }

    /// Oldest arrival in `bucket`.
    #[inline]
    pub fn oldest(&self, bucket: SlotId) -> Option<SlotId> {
        self.buckets.get(bucket)?.tail
    }

    #[inline]
    pub fn bucket_of(&self, node: SlotId) -> Option<SlotId> {
        self.nodes.get(node).map(|n| n.bucket)
    }

    /// Count of the bucket that currently holds `node`.
    #[inline]
    pub fn count_of(&self, node: SlotId) -> Option<u64> {
        let bucket = self.nodes.get(node)?.bucket;
        self.count_of_bucket(bucket)
    }

    #[inline]
    pub fn key(&self, node: SlotId) -> Option<&K> {
        self.nodes.get(node).map(|n| &n.key)
    }

    /// Splices a new empty bucket for `count` directly after `anchor`.
    ///
    /// `None` as the anchor places the bucket at the front of the chain,
    /// which is where a count-1 bucket goes when a key first appears.
    pub fn insert_bucket_after(&mut self, anchor: Option<SlotId>, count: u64) -> Option<SlotId> {
        let next = match anchor {
            Some(anchor) => self.buckets.get(anchor)?.next,
            None => self.front,
        };
        Some(self.link_bucket(count, anchor, next))
    }

    /// Splices a new empty bucket for `count` directly before `anchor`.
    pub fn insert_bucket_before(&mut self, anchor: SlotId, count: u64) -> Option<SlotId> {
        let prev = self.buckets.get(anchor)?.prev;
        Some(self.link_bucket(count, prev, Some(anchor)))
    }

    fn link_bucket(&mut self, count: u64, prev: Option<SlotId>, next: Option<SlotId>) -> SlotId {
        debug_assert!(!self.by_count.contains_key(&count));
        debug_assert!(
            prev.and_then(|p| self.count_of_bucket(p))
                .is_none_or(|p| p < count)
        );
        debug_assert!(
            next.and_then(|n| self.count_of_bucket(n))
                .is_none_or(|n| n > count)
        );

        let id = self.buckets.insert(Bucket {
            prev,
            next,
            head: None,
            tail: None,
            count,
            len: 0,
        });

        match prev {
            Some(prev) => {
                if let Some(bucket) = self.buckets.get_mut(prev) {
                    bucket.next = Some(id);
                }
            },
            None => self.front = Some(id),
        }
        match next {
            Some(next) => {
                if let Some(bucket) = self.buckets.get_mut(next) {
                    bucket.prev = Some(id);
                }
            },
            None => self.back = Some(id),
        }
        self.by_count.insert(count, id);

        trace!("bucket created: count={} slot={}", count, id.index());
        id
    }

    /// Unlinks and frees `bucket` if it holds no nodes. Returns `true` if the
    /// bucket was retired.
    pub fn retire_if_empty(&mut self, bucket: SlotId) -> bool {
        let (prev, next, count) = match self.buckets.get(bucket) {
            Some(b) if b.len == 0 => (b.prev, b.next, b.count),
            _ => return false,
        };

        match prev {
            Some(prev) => {
                if let Some(b) = self.buckets.get_mut(prev) {
                    b.next = next;
                }
            },
            None => self.front = next,
        }
        match next {
            Some(next) => {
                if let Some(b) = self.buckets.get_mut(next) {
                    b.prev = prev;
                }
            },
            None => self.back = prev,
        }
        self.by_count.remove(&count);
        self.buckets.remove(bucket);

        trace!("bucket retired: count={} slot={}", count, bucket.index());
        true
    }

    /// Adds a new node for `key` at the front (newest end) of `bucket`.
    pub fn push_front(&mut self, bucket: SlotId, key: K) -> Option<SlotId> {
        if !self.buckets.contains(bucket) {
            return None;
        }
        let id = self.nodes.insert(Node {
            prev: None,
            next: None,
            bucket,
            key,
        });
        self.attach_front(bucket, id)?;
        Some(id)
    }

    /// Moves `node` to the front of `target`. The node keeps its handle.
    ///
    /// `target` may be the node's current bucket, in which case the node is
    /// refreshed to the newest position.
    pub fn move_to_front(&mut self, node: SlotId, target: SlotId) -> Option<()> {
        if !self.buckets.contains(target) {
            return None;
        }
        self.detach(node)?;
        self.attach_front(target, node)
    }

    /// Removes `node` and returns its key with the bucket it was in. The
    /// bucket itself is left in place; callers decide whether to retire it.
    pub fn remove_node(&mut self, node: SlotId) -> Option<(K, SlotId)> {
        let bucket = self.detach(node)?;
        let node = self.nodes.remove(node)?;
        Some((node.key, bucket))
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.buckets.clear();
        self.by_count.clear();
        self.front = None;
        self.back = None;
    }

    pub fn shrink_to_fit(&mut self) {
        self.nodes.shrink_to_fit();
        self.buckets.shrink_to_fit();
        self.by_count.shrink_to_fit();
    }

    pub fn approx_bytes(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.nodes.approx_bytes()
            + self.buckets.approx_bytes()
            + self.by_count.capacity() * std::mem::size_of::<(u64, SlotId)>()
    }

    /// Walks buckets front to back yielding `(count, keys_at_count)`.
    pub fn iter(&self) -> BucketIter<'_, K> {
        BucketIter {
            chain: self,
            current: self.front,
        }
    }

    fn detach(&mut self, id: SlotId) -> Option<SlotId> {
        let (prev, next, bucket) = {
            let node = self.nodes.get(id)?;
            (node.prev, node.next, node.bucket)
        };

        match prev {
            Some(prev) => self.nodes.get_mut(prev)?.next = next,
            None => self.buckets.get_mut(bucket)?.head = next,
        }
        match next {
            Some(next) => self.nodes.get_mut(next)?.prev = prev,
            None => self.buckets.get_mut(bucket)?.tail = prev,
        }
        self.buckets.get_mut(bucket)?.len -= 1;

        let node = self.nodes.get_mut(id)?;
        node.prev = None;
        node.next = None;
        Some(bucket)
    }

    fn attach_front(&mut self, bucket: SlotId, id: SlotId) -> Option<()> {
        let old_head = self.buckets.get(bucket)?.head;
        {
            let node = self.nodes.get_mut(id)?;
            node.prev = None;
            node.next = old_head;
            node.bucket = bucket;
        }
        match old_head {
            Some(old_head) => self.nodes.get_mut(old_head)?.prev = Some(id),
            None => self.buckets.get_mut(bucket)?.tail = Some(id),
        }
        let b = self.buckets.get_mut(bucket)?;
        b.head = Some(id);
        b.len += 1;
        Some(())
    }

    /// Verifies ordering, uniqueness, non-emptiness and link symmetry.
    ///
    /// O(n) in nodes plus buckets. Intended for tests and debugging.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.by_count.len() != self.buckets.len() {
            return Err(InvariantError::new(format!(
                "count index has {} entries but {} buckets are live",
                self.by_count.len(),
                self.buckets.len()
            )));
        }
        if self.buckets.is_empty() {
            if self.front.is_some() || self.back.is_some() {
                return Err(InvariantError::new("empty chain has dangling ends"));
            }
            if !self.nodes.is_empty() {
                return Err(InvariantError::new("nodes present without buckets"));
            }
            return Ok(());
        }

        let mut current = self.front;
        let mut last_bucket: Option<SlotId> = None;
        let mut last_count: Option<u64> = None;
        let mut buckets_seen = 0usize;
        let mut nodes_seen = 0usize;

        while let Some(id) = current {
            buckets_seen += 1;
            if buckets_seen > self.buckets.len() {
                return Err(InvariantError::new("bucket chain contains a cycle"));
            }
            let bucket = self
                .buckets
                .get(id)
                .ok_or_else(|| InvariantError::new("chain links to a freed bucket"))?;

            if bucket.prev != last_bucket {
                return Err(InvariantError::new(format!(
                    "bucket count={} has a stale prev link",
                    bucket.count
                )));
            }
            if bucket.count == 0 {
                return Err(InvariantError::new("count-0 bucket stored in chain"));
            }
            if let Some(prev_count) = last_count {
                if prev_count >= bucket.count {
                    return Err(InvariantError::new(format!(
                        "counts out of order: {} before {}",
                        prev_count, bucket.count
                    )));
                }
            }
            if self.by_count.get(&bucket.count) != Some(&id) {
                return Err(InvariantError::new(format!(
                    "count index disagrees for count={}",
                    bucket.count
                )));
            }
            if bucket.len == 0 || bucket.head.is_none() {
                return Err(InvariantError::new(format!(
                    "bucket count={} is empty",
                    bucket.count
                )));
            }

            let mut node_id = bucket.head;
            let mut last_node: Option<SlotId> = None;
            let mut in_bucket = 0usize;
            while let Some(nid) = node_id {
                in_bucket += 1;
                if in_bucket > bucket.len {
                    return Err(InvariantError::new(format!(
                        "bucket count={} holds more nodes than its length",
                        bucket.count
                    )));
                }
                let node = self
                    .nodes
                    .get(nid)
                    .ok_or_else(|| InvariantError::new("bucket links to a freed node"))?;
                if node.bucket != id {
                    return Err(InvariantError::new("node points at the wrong bucket"));
                }
                if node.prev != last_node {
                    return Err(InvariantError::new("node has a stale prev link"));
                }
                last_node = Some(nid);
                node_id = node.next;
            }
            if in_bucket != bucket.len {
                return Err(InvariantError::new(format!(
                    "bucket count={} length {} but {} nodes linked",
                    bucket.count, bucket.len, in_bucket
                )));
            }
            if bucket.tail != last_node {
                return Err(InvariantError::new("bucket tail is stale"));
            }

            nodes_seen += in_bucket;
            last_count = Some(bucket.count);
            last_bucket = Some(id);
            current = bucket.next;
        }

        if self.back != last_bucket {
            return Err(InvariantError::new("chain back does not match last bucket"));
        }
        if buckets_seen != self.buckets.len() {
            return Err(InvariantError::new("live bucket unreachable from chain"));
        }
        if nodes_seen != self.nodes.len() {
            return Err(InvariantError::new("live node unreachable from chain"));
        }
        Ok(())
    }
}

impl<K> Default for BucketChain<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Front-to-back iterator over `(count, keys_at_count)`.
#[derive(Debug)]
pub struct BucketIter<'a, K> {
    chain: &'a BucketChain<K>,
    current: Option<SlotId>,
}

impl<'a, K> Iterator for BucketIter<'a, K> {
    type Item = (u64, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let bucket = self.chain.buckets.get(self.current?)?;
        self.current = bucket.next;
        Some((bucket.count, bucket.len))
    }
}
