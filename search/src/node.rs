//! Search node, waypoint projection, and frontier ordering key.

use std::cmp::Ordering;

use gridwalk_kernel::grid::cell::Cell;

/// Index of a [`SearchNode`] in the discovered-node arena.
///
/// Parent links are `NodeId`s, never references, so any number of children
/// may point at one predecessor without owning it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Arena slot of this node.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// One discovered grid cell plus its path-cost bookkeeping.
///
/// Identity is `cell` alone. The discovered-set index is keyed by [`Cell`],
/// so two `SearchNode`s for the same coordinates never coexist in one search.
#[derive(Debug, Clone)]
pub struct SearchNode {
    /// Grid coordinates (identity key).
    pub cell: Cell,
    /// Accumulated movement cost from the start along the best known path
    /// (g-cost). Only ever lowered after creation.
    pub distance_to_start: f32,
    /// Heuristic estimate to the destination (h-cost). Set once on discovery.
    pub distance_to_end: f32,
    /// Predecessor on the best known path (`None` for the start node).
    pub parent: Option<NodeId>,
    /// Discovery counter used for deterministic tie-breaking.
    pub creation_order: u64,
    /// `true` while the node sits in the frontier awaiting expansion.
    pub(crate) open: bool,
}

impl SearchNode {
    /// `f = distance_to_start + distance_to_end`.
    #[must_use]
    pub fn f_cost(&self) -> f32 {
        self.distance_to_start + self.distance_to_end
    }

    /// Whether the node is still waiting in the frontier.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Public projection without the arena-relative parent link.
    #[must_use]
    pub fn to_path_node(&self) -> PathNode {
        PathNode {
            x: self.cell.x,
            y: self.cell.y,
            distance_to_start: self.distance_to_start,
            distance_to_end: self.distance_to_end,
        }
    }
}

/// A waypoint of a found path, in start-to-destination order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathNode {
    pub x: i32,
    pub y: i32,
    pub distance_to_start: f32,
    pub distance_to_end: f32,
}

impl PathNode {
    /// Coordinates of this waypoint.
    #[must_use]
    pub fn cell(&self) -> Cell {
        Cell::new(self.x, self.y)
    }
}

/// Anything that sits on a grid cell. Lets the compressor run over full
/// [`PathNode`]s as well as bare [`Cell`]s.
pub trait GridPosition {
    fn position(&self) -> Cell;
}

impl GridPosition for Cell {
    fn position(&self) -> Cell {
        *self
    }
}

impl GridPosition for PathNode {
    fn position(&self) -> Cell {
        self.cell()
    }
}

impl GridPosition for SearchNode {
    fn position(&self) -> Cell {
        self.cell
    }
}

/// The frontier ordering key: `(f_cost, creation_order)`.
///
/// Lower `f_cost` first (IEEE total order), then older `creation_order`.
/// Re-queued nodes keep their original `creation_order`, so ties resolve by
/// first discovery.
#[derive(Debug, Clone, Copy)]
pub struct FrontierKey {
    pub f_cost: f32,
    pub creation_order: u64,
}

impl PartialEq for FrontierKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierKey {}

impl PartialOrd for FrontierKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f_cost
            .total_cmp(&other.f_cost)
            .then(self.creation_order.cmp(&other.creation_order))
    }
}

impl From<&SearchNode> for FrontierKey {
    fn from(node: &SearchNode) -> Self {
        Self {
            f_cost: node.f_cost(),
            creation_order: node.creation_order,
        }
    }
}
