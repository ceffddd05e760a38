//! Best-first frontier (open set) with lazy deletion.
//!
//! Decrease-key is expressed as re-insertion: when a node's cost improves
//! the caller pushes a fresh entry, and the old one becomes stale. Stale
//! entries are discarded on pop by asking the caller whether the entry's key
//! still matches the node's current key.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::node::{FrontierKey, NodeId};

/// A frontier entry. `BinaryHeap` is a max-heap, so the key is wrapped in
/// `Reverse` to pop the lowest `f_cost` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct FrontierEntry {
    key: Reverse<FrontierKey>,
    node: NodeId,
}

/// Best-first frontier manager.
///
/// Maintains:
/// - A `BinaryHeap` for O(log n) pop of the best entry
/// - A high-water mark of heap size
/// - A count of stale entries skipped
#[derive(Debug, Default)]
pub struct Frontier {
    heap: BinaryHeap<FrontierEntry>,
    high_water: u64,
    stale_skipped: u64,
}

impl Frontier {
    /// Create an empty frontier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `node` under `key`.
    pub fn push(&mut self, node: NodeId, key: FrontierKey) {
        self.heap.push(FrontierEntry {
            key: Reverse(key),
            node,
        });
        let size = self.heap.len() as u64;
        if size > self.high_water {
            self.high_water = size;
        }
    }

    /// Pop the best live entry.
    ///
    /// `is_live(node, key)` must return `false` for entries superseded by a
    /// later push or whose node has already been expanded. Those are dropped
    /// and counted. Returns `None` once no live entry remains.
    pub fn pop_live<F>(&mut self, mut is_live: F) -> Option<NodeId>
    where
        F: FnMut(NodeId, FrontierKey) -> bool,
    {
        while let Some(entry) = self.heap.pop() {
            if is_live(entry.node, entry.key.0) {
                return Some(entry.node);
            }
            self.stale_skipped += 1;
        }
        None
    }

    /// Number of queued entries, stale ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether no entries are queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// High-water mark of queued entries.
    #[must_use]
    pub fn high_water(&self) -> u64 {
        self.high_water
    }

    /// Stale entries dropped by [`pop_live`](Self::pop_live) so far.
    #[must_use]
    pub fn stale_skipped(&self) -> u64 {
        self.stale_skipped
    }
}
