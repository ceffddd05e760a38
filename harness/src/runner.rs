//! Scenario runner: search, compress, and package the result as a bundle.
//!
//! # Pipeline
//!
//! ```text
//! Scenario → scenario.json
//!   → PathSearchEngine::search_with_report() → search_report.json
//!   → compress() → waypoints.json (bound to both by digest)
//!   → TileGrid::render() → route.txt (observational)
//!   → build_bundle()
//! ```
//!
//! A run that does not reach its destination is still a successful run:
//! the report records why, and the bundle carries empty waypoints.

use log::{debug, trace};

use gridwalk_kernel::grid::cell::Cell;
use gridwalk_kernel::proof::canon::{canonical_json_bytes, to_milli, CanonError};
use gridwalk_kernel::proof::hash::{canonical_hash, ContentHash, HashDomain};
use gridwalk_search::compress::{compress, path_cost};
use gridwalk_search::node::PathNode;
use gridwalk_search::report::{cell_to_json, path_node_to_json, SearchReport};
use gridwalk_search::search::PathSearchEngine;

use crate::bundle::{
    build_bundle, BundleBuildError, RouteBundle, ROUTE_RENDER_ARTIFACT, SCENARIO_ARTIFACT,
    SEARCH_REPORT_ARTIFACT, WAYPOINTS_ARTIFACT,
};
use crate::scenarios::Scenario;

/// Error during a scenario run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunError {
    /// Canonical JSON serialization failed.
    CanonFailed { detail: String },
    /// Bundle assembly failed.
    BundleFailed(BundleBuildError),
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CanonFailed { detail } => write!(f, "canonical JSON error: {detail}"),
            Self::BundleFailed(e) => write!(f, "bundle assembly failed: {e}"),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::BundleFailed(e) => Some(e),
            Self::CanonFailed { .. } => None,
        }
    }
}

impl From<CanonError> for RunError {
    fn from(e: CanonError) -> Self {
        Self::CanonFailed {
            detail: format!("{e}"),
        }
    }
}

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct ScenarioRun {
    pub report: SearchReport,
    /// Compressed form of `report.path`.
    pub compressed: Vec<PathNode>,
    pub bundle: RouteBundle,
}

/// Run `scenario` and return its bundle.
///
/// # Errors
///
/// Returns [`RunError`] if artifact serialization or bundle assembly fails.
pub fn run_scenario(scenario: &Scenario) -> Result<RouteBundle, RunError> {
    Ok(execute(scenario)?.bundle)
}

/// Run `scenario`, keeping the in-memory report alongside the bundle.
///
/// # Errors
///
/// See [`run_scenario`].
pub fn execute(scenario: &Scenario) -> Result<ScenarioRun, RunError> {
    let engine = PathSearchEngine::configure(
        &scenario.grid,
        scenario.destination,
        scenario.start,
        scenario.policy,
    );
    let report = engine.search_with_report();
    let compressed = compress(&report.path);

    debug!(
        "[gridwalk] scenario {}: {} ({} waypoints, {} after compression, {} expansions)",
        scenario.id,
        report.termination.as_str(),
        report.path.len(),
        compressed.len(),
        report.stats.expansions
    );

    let scenario_bytes = canonical_json_bytes(&scenario_json(scenario)?)?;
    let report_bytes = report.to_canonical_json_bytes()?;
    let waypoints_bytes = waypoints_bytes(&report, &compressed, &scenario_bytes, &report_bytes)?;
    let route_cells: Vec<Cell> = report.path.iter().map(PathNode::cell).collect();
    let render = scenario.grid.render(&route_cells);

    trace!(
        "[gridwalk] artifacts: scenario={}B report={}B waypoints={}B",
        scenario_bytes.len(),
        report_bytes.len(),
        waypoints_bytes.len()
    );

    let bundle = build_bundle(vec![
        (SCENARIO_ARTIFACT.into(), scenario_bytes, true),
        (SEARCH_REPORT_ARTIFACT.into(), report_bytes, true),
        (WAYPOINTS_ARTIFACT.into(), waypoints_bytes, true),
        (ROUTE_RENDER_ARTIFACT.into(), render.into_bytes(), false),
    ])
    .map_err(RunError::BundleFailed)?;

    Ok(ScenarioRun {
        report,
        compressed,
        bundle,
    })
}

/// Canonical JSON value of a scenario fixture.
///
/// # Errors
///
/// Returns [`RunError::CanonFailed`] if the policy cannot be hashed.
pub fn scenario_json(scenario: &Scenario) -> Result<serde_json::Value, RunError> {
    let policy = scenario.policy.to_json();
    let policy_digest = canonical_hash(HashDomain::SearchPolicy, &canonical_json_bytes(&policy)?);
    let rows: Vec<String> = scenario
        .grid
        .render(&[])
        .lines()
        .map(str::to_string)
        .collect();

    Ok(serde_json::json!({
        "destination": cell_to_json(scenario.destination),
        "height": scenario.grid.height(),
        "id": scenario.id,
        "policy": policy,
        "policy_digest": policy_digest.as_str(),
        "rows": rows,
        "schema_version": "scenario.v1",
        "start": cell_to_json(scenario.start),
        "width": scenario.grid.width(),
    }))
}

fn waypoints_bytes(
    report: &SearchReport,
    compressed: &[PathNode],
    scenario_bytes: &[u8],
    report_bytes: &[u8],
) -> Result<Vec<u8>, RunError> {
    let compressed_json = serde_json::Value::Array(compressed.iter().map(path_node_to_json).collect());
    let waypoints_digest: ContentHash =
        canonical_hash(HashDomain::Waypoints, &canonical_json_bytes(&compressed_json)?);

    let value = serde_json::json!({
        "compressed": compressed_json,
        "compressed_length_milli": length_milli(path_cost(compressed)),
        "path_length_milli": length_milli(path_cost(&report.path)),
        "report_digest": canonical_hash(HashDomain::SearchReport, report_bytes).as_str(),
        "scenario_digest": canonical_hash(HashDomain::Scenario, scenario_bytes).as_str(),
        "schema_version": "waypoints.v1",
        "termination_reason": report.termination.as_str(),
        "waypoints_digest": waypoints_digest.as_str(),
    });
    Ok(canonical_json_bytes(&value)?)
}

#[allow(clippy::cast_possible_truncation)]
fn length_milli(length: f64) -> i64 {
    to_milli(length as f32)
}
