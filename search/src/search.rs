//! `PathSearchEngine`: configured A* over a walkability oracle.
//!
//! # Loop
//!
//! The engine keeps a `current` node. Each iteration (at most
//! `max_expansions` of them):
//!
//! 1. If `current` is the destination, walk parent links back to the start
//!    and return the reversed chain.
//! 2. Otherwise expand `current`: generate up to eight neighbours, discard
//!    unwalkable ones (and diagonal corner cuts when disallowed), improve
//!    cheaper routes to known cells in place, and discover new cells.
//! 3. Pop the lowest-`f` live node off the frontier as the new `current`.
//!    An empty frontier ends the search as [`TerminationReason::FrontierExhausted`].
//!
//! All discovered/frontier state is local to one call, so one engine can
//! run any number of sequential searches and engines on different threads
//! share nothing but the oracle.

use log::{debug, trace};

use gridwalk_kernel::grid::cell::Cell;

use crate::compress;
use crate::contract::WalkabilityOracle;
use crate::discovered::DiscoveredSet;
use crate::frontier::Frontier;
use crate::node::{FrontierKey, GridPosition, NodeId, PathNode};
use crate::policy::SearchPolicy;
use crate::report::{SearchReport, SearchStats, TerminationReason};

/// Cost of one diagonal step.
pub const DIAGONAL_STEP_COST: f32 = std::f32::consts::SQRT_2;

/// Cost of one orthogonal step.
pub const ORTHOGONAL_STEP_COST: f32 = 1.0;

/// Orthogonal offsets in generation order: top, right, bottom, left.
const ORTHOGONAL_OFFSETS: [(i32, i32); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// Diagonal offsets in generation order: top-right, bottom-right,
/// bottom-left, top-left.
const DIAGONAL_OFFSETS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

/// A search engine bound to one oracle, one start, one destination.
#[derive(Debug, Clone)]
pub struct PathSearchEngine<O> {
    oracle: O,
    start: Cell,
    destination: Cell,
    policy: SearchPolicy,
}

impl<O: WalkabilityOracle> PathSearchEngine<O> {
    /// Configure an engine. Never fails: any coordinates are accepted and
    /// bounds are entirely the oracle's business.
    pub fn configure(
        oracle: O,
        destination: impl Into<Cell>,
        start: impl Into<Cell>,
        policy: SearchPolicy,
    ) -> Self {
        Self {
            oracle,
            start: start.into(),
            destination: destination.into(),
            policy,
        }
    }

    /// Point the engine at a new start and destination, keeping the oracle
    /// and policy.
    pub fn reconfigure(&mut self, destination: impl Into<Cell>, start: impl Into<Cell>) {
        self.destination = destination.into();
        self.start = start.into();
    }

    /// Replace the policy.
    pub fn set_policy(&mut self, policy: SearchPolicy) {
        self.policy = policy;
    }

    #[must_use]
    pub fn start(&self) -> Cell {
        self.start
    }

    #[must_use]
    pub fn destination(&self) -> Cell {
        self.destination
    }

    #[must_use]
    pub fn policy(&self) -> &SearchPolicy {
        &self.policy
    }

    #[must_use]
    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Run the search and return the start-to-destination path, or an empty
    /// vector if the destination was not reached for any reason.
    #[must_use]
    pub fn search(&self) -> Vec<PathNode> {
        self.search_with_report().path
    }

    /// Run the search and return the path together with diagnostics.
    #[must_use]
    pub fn search_with_report(&self) -> SearchReport {
        trace!(
            "[gridwalk] search: start={} destination={} diagonal={} corner_cutting={} max_expansions={}",
            self.start,
            self.destination,
            self.policy.allow_diagonal_movement,
            self.policy.allow_corner_cutting,
            self.policy.max_expansions
        );

        if !self.oracle.is_cell_walkable(self.destination) {
            debug!(
                "[gridwalk] no path: destination {} is not walkable",
                self.destination
            );
            return self.finish(&SearchContext::default(), TerminationReason::DestinationBlocked, None);
        }

        let mut ctx = SearchContext::default();
        let mut current = ctx.discovered.insert(self.start, 0.0, self.heuristic(self.start), None);

        for _ in 0..self.policy.max_expansions {
            if ctx.discovered.get(current).cell == self.destination {
                return self.finish(&ctx, TerminationReason::DestinationReached, Some(current));
            }

            self.expand(&mut ctx, current);

            let discovered = &ctx.discovered;
            let next = ctx.frontier.pop_live(|id, key| {
                let node = discovered.get(id);
                node.is_open() && key == FrontierKey::from(node)
            });
            let Some(next) = next else {
                return self.finish(&ctx, TerminationReason::FrontierExhausted, None);
            };
            ctx.discovered.get_mut(next).open = false;
            current = next;
        }

        self.finish(&ctx, TerminationReason::ExpansionBudgetExceeded, None)
    }

    /// Collinear waypoint elimination; see [`compress::compress`].
    #[must_use]
    pub fn compress<T: GridPosition + Clone>(path: &[T]) -> Vec<T> {
        compress::compress(path)
    }

    fn expand(&self, ctx: &mut SearchContext, current: NodeId) {
        let (origin, base_cost) = {
            let node = ctx.discovered.get(current);
            (node.cell, node.distance_to_start)
        };
        ctx.expanded.push(origin);

        let orthogonal = ORTHOGONAL_OFFSETS
            .iter()
            .map(|&offset| (offset, ORTHOGONAL_STEP_COST));
        let diagonal = DIAGONAL_OFFSETS
            .iter()
            .filter(|_| self.policy.allow_diagonal_movement)
            .map(|&offset| (offset, DIAGONAL_STEP_COST));

        for ((dx, dy), step_cost) in orthogonal.chain(diagonal) {
            let neighbour = origin.offset(dx, dy);
            if neighbour == origin || !self.oracle.is_cell_walkable(neighbour) {
                continue;
            }
            if dx != 0 && dy != 0 && self.policy.blocks_corner_cutting() && self.cuts_corner(origin, neighbour) {
                continue;
            }

            let candidate_cost = base_cost + step_cost;

            if let Some(existing) = ctx.discovered.lookup(neighbour) {
                let node = ctx.discovered.get_mut(existing);
                if candidate_cost < node.distance_to_start {
                    trace!(
                        "[gridwalk] cheaper route to {}: {:.3} -> {:.3} via {}",
                        neighbour,
                        node.distance_to_start,
                        candidate_cost,
                        origin
                    );
                    node.distance_to_start = candidate_cost;
                    node.parent = Some(current);
                    ctx.cost_improvements += 1;
                    if node.is_open() {
                        let key = FrontierKey::from(&*node);
                        ctx.frontier.push(existing, key);
                    }
                }
                continue;
            }

            let id = ctx.discovered.insert(
                neighbour,
                candidate_cost,
                self.heuristic(neighbour),
                Some(current),
            );
            let node = ctx.discovered.get_mut(id);
            node.open = true;
            let key = FrontierKey::from(&*node);
            ctx.frontier.push(id, key);
        }
    }

    /// A diagonal step cuts a corner unless both orthogonal cells it passes
    /// between (same row, same column) are walkable.
    fn cuts_corner(&self, from: Cell, to: Cell) -> bool {
        !self.oracle.is_walkable(to.x, from.y) || !self.oracle.is_walkable(from.x, to.y)
    }

    /// Euclidean distance with diagonal movement, Manhattan without.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn heuristic(&self, cell: Cell) -> f32 {
        if self.policy.allow_diagonal_movement {
            cell.euclidean_distance(self.destination) as f32
        } else {
            cell.manhattan_distance(self.destination) as f32
        }
    }

    fn finish(
        &self,
        ctx: &SearchContext,
        termination: TerminationReason,
        reached: Option<NodeId>,
    ) -> SearchReport {
        let path = reached
            .map(|id| ctx.discovered.path_to(id))
            .unwrap_or_default();
        let stats = SearchStats {
            expansions: ctx.expanded.len() as u64,
            discovered: ctx.discovered.len() as u64,
            cost_improvements: ctx.cost_improvements,
            stale_entries_skipped: ctx.frontier.stale_skipped(),
            frontier_high_water: ctx.frontier.high_water(),
        };

        match termination {
            TerminationReason::DestinationReached => debug!(
                "[gridwalk] path found: {} waypoints, cost={:.3}, expansions={}",
                path.len(),
                path.last().map_or(0.0, |n| n.distance_to_start),
                stats.expansions
            ),
            TerminationReason::DestinationBlocked => {}
            other => debug!(
                "[gridwalk] no path: {} after {} expansions ({} discovered)",
                other.as_str(),
                stats.expansions,
                stats.discovered
            ),
        }

        SearchReport {
            start: self.start,
            destination: self.destination,
            policy: self.policy,
            termination,
            path,
            expanded: ctx.expanded.clone(),
            stats,
        }
    }
}

/// Per-call search state.
#[derive(Debug, Default)]
struct SearchContext {
    discovered: DiscoveredSet,
    frontier: Frontier,
    expanded: Vec<Cell>,
    cost_improvements: u64,
}
