//! Discovered-node arena keyed by cell coordinates.
//!
//! Holds every [`SearchNode`] created during one search, expanded or not.
//! Lookup is by [`Cell`] only; cost comparisons always read the stored entry.

use std::collections::HashMap;

use gridwalk_kernel::grid::cell::Cell;

use crate::node::{NodeId, PathNode, SearchNode};

/// Arena of discovered nodes plus the coordinate → slot index.
#[derive(Debug, Default)]
pub struct DiscoveredSet {
    nodes: Vec<SearchNode>,
    index: HashMap<Cell, NodeId>,
}

impl DiscoveredSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot of the node at `cell`, if it has been discovered.
    #[must_use]
    pub fn lookup(&self, cell: Cell) -> Option<NodeId> {
        self.index.get(&cell).copied()
    }

    /// Register a newly discovered cell.
    ///
    /// The caller guarantees `cell` is not yet present; a duplicate would
    /// break the coordinate-identity invariant, so it is rejected and the
    /// existing slot is returned instead.
    pub fn insert(
        &mut self,
        cell: Cell,
        distance_to_start: f32,
        distance_to_end: f32,
        parent: Option<NodeId>,
    ) -> NodeId {
        if let Some(existing) = self.lookup(cell) {
            return existing;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(SearchNode {
            cell,
            distance_to_start,
            distance_to_end,
            parent,
            creation_order: self.nodes.len() as u64,
            open: false,
        });
        self.index.insert(cell, id);
        id
    }

    /// Shared access to a node.
    #[must_use]
    pub fn get(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.index()]
    }

    /// Mutable access to a node.
    pub fn get_mut(&mut self, id: NodeId) -> &mut SearchNode {
        &mut self.nodes[id.index()]
    }

    /// Number of discovered nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether nothing has been discovered yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in discovery order.
    #[must_use]
    pub fn nodes(&self) -> &[SearchNode] {
        &self.nodes
    }

    /// Follow parent links from `id` back to the root and return the
    /// waypoints in root-to-`id` order.
    #[must_use]
    pub fn path_to(&self, id: NodeId) -> Vec<PathNode> {
        let mut path = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let node = self.get(current);
            path.push(node.to_path_node());
            // A chain can never be longer than the arena.
            if path.len() > self.nodes.len() {
                break;
            }
            cursor = node.parent;
        }
        path.reverse();
        path
    }
}
