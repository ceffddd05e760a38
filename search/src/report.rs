//! `SearchReport`: the path plus why and how the search stopped.
//!
//! The path is the external contract; termination reason and counters are
//! diagnostics. Canonical JSON encodes costs as integer thousandths
//! (`*_milli`) because the canonicalizer rejects floats.

use gridwalk_kernel::grid::cell::Cell;
use gridwalk_kernel::proof::canon::{canonical_json_bytes, to_milli, CanonError};
use gridwalk_kernel::proof::hash::{canonical_hash, ContentHash, HashDomain};

use crate::error::SearchError;
use crate::node::PathNode;
use crate::policy::SearchPolicy;

/// Why the search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// The destination was popped as the current node; the path is non-empty.
    DestinationReached,
    /// The destination cell is not walkable. No expansion happened.
    DestinationBlocked,
    /// Every reachable cell was expanded without reaching the destination.
    FrontierExhausted,
    /// `max_expansions` was hit before the destination was reached.
    ExpansionBudgetExceeded,
}

impl TerminationReason {
    /// Stable snake-case name used in JSON and log lines.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DestinationReached => "destination_reached",
            Self::DestinationBlocked => "destination_blocked",
            Self::FrontierExhausted => "frontier_exhausted",
            Self::ExpansionBudgetExceeded => "expansion_budget_exceeded",
        }
    }
}

/// Counters collected during one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchStats {
    /// Nodes expanded (neighbour generation performed).
    pub expansions: u64,
    /// Nodes ever created, start node included.
    pub discovered: u64,
    /// Times an existing node received a strictly cheaper route.
    pub cost_improvements: u64,
    /// Superseded frontier entries dropped on pop.
    pub stale_entries_skipped: u64,
    /// Largest frontier size seen.
    pub frontier_high_water: u64,
}

/// Result of [`PathSearchEngine::search_with_report`](crate::search::PathSearchEngine::search_with_report).
#[derive(Debug, Clone)]
pub struct SearchReport {
    pub start: Cell,
    pub destination: Cell,
    pub policy: SearchPolicy,
    pub termination: TerminationReason,
    /// Start-to-destination waypoints; empty unless the destination was reached.
    pub path: Vec<PathNode>,
    /// Cells in the order they were expanded.
    pub expanded: Vec<Cell>,
    pub stats: SearchStats,
}

impl SearchReport {
    /// `true` if a path was found.
    #[must_use]
    pub fn is_destination_reached(&self) -> bool {
        self.termination == TerminationReason::DestinationReached
    }

    /// Accumulated cost of the found path, if any.
    #[must_use]
    pub fn path_cost(&self) -> Option<f32> {
        self.path.last().map(|n| n.distance_to_start)
    }

    /// Split into path or typed failure.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::SearchBudgetExhausted`] when the expansion
    /// ceiling stopped the search, [`SearchError::NoPathFound`] for the
    /// other failure reasons.
    pub fn into_result(self) -> Result<Vec<PathNode>, SearchError> {
        match self.termination {
            TerminationReason::DestinationReached => Ok(self.path),
            TerminationReason::ExpansionBudgetExceeded => Err(SearchError::SearchBudgetExhausted {
                expansions: self.stats.expansions,
            }),
            reason => Err(SearchError::NoPathFound { reason }),
        }
    }

    /// Serialize to canonical JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if serialization fails.
    pub fn to_canonical_json_bytes(&self) -> Result<Vec<u8>, CanonError> {
        canonical_json_bytes(&self.to_json_value())
    }

    /// Content hash of the canonical JSON under [`HashDomain::SearchReport`].
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if serialization fails.
    pub fn digest(&self) -> Result<ContentHash, CanonError> {
        let bytes = self.to_canonical_json_bytes()?;
        Ok(canonical_hash(HashDomain::SearchReport, &bytes))
    }

    fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "destination": cell_to_json(self.destination),
            "expanded": self.expanded.iter().copied().map(cell_to_json).collect::<Vec<_>>(),
            "path": self.path.iter().map(path_node_to_json).collect::<Vec<_>>(),
            "policy": self.policy.to_json(),
            "start": cell_to_json(self.start),
            "stats": stats_to_json(&self.stats),
            "termination_reason": self.termination.as_str(),
        })
    }
}

/// `[x, y]` pair.
#[must_use]
pub fn cell_to_json(cell: Cell) -> serde_json::Value {
    serde_json::json!([cell.x, cell.y])
}

/// Waypoint with fixed-point costs.
#[must_use]
pub fn path_node_to_json(node: &PathNode) -> serde_json::Value {
    serde_json::json!({
        "distance_to_end_milli": to_milli(node.distance_to_end),
        "distance_to_start_milli": to_milli(node.distance_to_start),
        "x": node.x,
        "y": node.y,
    })
}

fn stats_to_json(stats: &SearchStats) -> serde_json::Value {
    serde_json::json!({
        "cost_improvements": stats.cost_improvements,
        "discovered": stats.discovered,
        "expansions": stats.expansions,
        "frontier_high_water": stats.frontier_high_water,
        "stale_entries_skipped": stats.stale_entries_skipped,
    })
}
