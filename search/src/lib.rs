//! Gridwalk Search: deterministic A* over a binary-walkability grid.
//!
//! This crate depends only on `gridwalk_kernel`. It does NOT depend on
//! `gridwalk_harness`; concrete grids live there.
//!
//! # Crate dependency graph
//!
//! ```text
//! gridwalk_kernel  ←  gridwalk_search  ←  gridwalk_harness
//! (cells, hashing)    (engine, frontier)   (tile grids, scenarios, bundles)
//! ```
//!
//! # Key types
//!
//! - [`WalkabilityOracle`](contract::WalkabilityOracle): "is `(x, y)` walkable?"
//! - [`PathSearchEngine`](search::PathSearchEngine): configured search over one oracle
//! - [`SearchPolicy`](policy::SearchPolicy): movement rules and iteration ceiling
//! - [`PathNode`](node::PathNode): one waypoint of a found path
//! - [`SearchReport`](report::SearchReport): path plus termination diagnostics
//! - [`compress`](compress::compress): collinear waypoint elimination

#![forbid(unsafe_code)]

pub mod compress;
pub mod contract;
pub mod discovered;
pub mod error;
pub mod frontier;
pub mod node;
pub mod policy;
pub mod report;
pub mod search;
