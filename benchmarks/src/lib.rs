//! Shared helpers for gridwalk benchmark suites.

use gridwalk_harness::scenarios::{self, Scenario};
use gridwalk_kernel::grid::cell::Cell;
use gridwalk_kernel::proof::canon::CanonError;
use gridwalk_kernel::proof::hash::{canonical_hash, ContentHash, HashDomain};
use gridwalk_search::report::SearchReport;
use gridwalk_search::search::PathSearchEngine;

/// A named benchmark workload.
pub struct Workload {
    pub name: &'static str,
    pub scenario: Scenario,
}

/// The workloads every suite measures, smallest first.
///
/// Ceilings are raised where the default would cut the search short, so
/// the numbers measure full searches. `long_corridor` keeps the default
/// ceiling and measures the budget-exceeded path.
#[must_use]
pub fn workloads() -> Vec<Workload> {
    let mut maze = scenarios::switchback_maze(41);
    maze.policy = maze.policy.with_max_expansions(10_000);
    let mut field = scenarios::open_field(64);
    field.policy = field.policy.with_max_expansions(10_000);

    vec![
        Workload {
            name: "wall_detour",
            scenario: scenarios::wall_detour(),
        },
        Workload {
            name: "sealed_room",
            scenario: scenarios::sealed_room(),
        },
        Workload {
            name: "open_field_64",
            scenario: field,
        },
        Workload {
            name: "switchback_41",
            scenario: maze,
        },
        Workload {
            name: "long_corridor",
            scenario: scenarios::long_corridor(2000),
        },
    ]
}

/// Run only the engine (no compression, no bundling).
#[must_use]
pub fn run_engine(scenario: &Scenario) -> SearchReport {
    PathSearchEngine::configure(
        &scenario.grid,
        scenario.destination,
        scenario.start,
        scenario.policy,
    )
    .search_with_report()
}

/// Fingerprint of a benchmarked result. Two timings are comparable only if
/// their guard digests agree.
///
/// # Errors
///
/// Returns [`CanonError`] if the report cannot be serialized.
pub fn guard_digest(report: &SearchReport) -> Result<ContentHash, CanonError> {
    let bytes = report.to_canonical_json_bytes()?;
    Ok(canonical_hash(HashDomain::BenchGuard, &bytes))
}

/// A staircase path of `len` cells alternating right and up steps every
/// `run` cells, for compressor benchmarks.
#[must_use]
pub fn staircase(len: usize, run: usize) -> Vec<Cell> {
    let run = run.max(1);
    let mut cell = Cell::new(0, 0);
    let mut out = Vec::with_capacity(len);
    for i in 0..len {
        out.push(cell);
        cell = if (i / run) % 2 == 0 {
            cell.offset(1, 0)
        } else {
            cell.offset(0, 1)
        };
    }
    out
}
