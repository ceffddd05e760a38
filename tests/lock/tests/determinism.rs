//! In-process determinism: repeated runs, concurrent engines, and engine
//! reuse all produce byte-identical reports and bundles.

use gridwalk_harness::runner::run_scenario;
use gridwalk_harness::scenarios::{self, Scenario};
use gridwalk_kernel::grid::cell::Cell;
use gridwalk_search::policy::SearchPolicy;
use gridwalk_search::search::PathSearchEngine;

const N: usize = 10;

fn report_bytes(scenario: &Scenario) -> Vec<u8> {
    PathSearchEngine::configure(
        &scenario.grid,
        scenario.destination,
        scenario.start,
        scenario.policy,
    )
    .search_with_report()
    .to_canonical_json_bytes()
    .unwrap()
}

// ---------------------------------------------------------------------------
// Repeated runs
// ---------------------------------------------------------------------------

#[test]
fn report_bytes_identical_across_runs() {
    for scenario in scenarios::builtin() {
        let first = report_bytes(&scenario);
        for _ in 1..N {
            assert_eq!(report_bytes(&scenario), first, "{}", scenario.id);
        }
    }
}

#[test]
fn bundle_digest_identical_across_runs() {
    for scenario in scenarios::builtin() {
        let first = run_scenario(&scenario).unwrap();
        for _ in 1..N {
            let again = run_scenario(&scenario).unwrap();
            assert_eq!(again.digest, first.digest, "{}", scenario.id);
            assert_eq!(again.manifest, first.manifest, "{}", scenario.id);
        }
    }
}

#[test]
fn distinct_scenarios_have_distinct_digests() {
    let digests: Vec<_> = scenarios::builtin()
        .iter()
        .map(|s| run_scenario(s).unwrap().digest)
        .collect();
    let mut unique = digests.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), digests.len());
}

#[test]
fn policy_change_changes_report_digest() {
    let strict = scenarios::diagonal_gap();
    let mut lenient = scenarios::diagonal_gap();
    lenient.policy = lenient.policy.with_corner_cutting(true);
    assert_ne!(report_bytes(&strict), report_bytes(&lenient));
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

#[test]
fn concurrent_engines_share_one_grid() {
    let scenario = scenarios::switchback_maze(21);
    let expected = report_bytes(&scenario);

    let results: Vec<Vec<u8>> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| report_bytes(&scenario)))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for bytes in results {
        assert_eq!(bytes, expected);
    }
}

// ---------------------------------------------------------------------------
// Engine reuse
// ---------------------------------------------------------------------------

#[test]
fn reconfigured_engine_matches_fresh_engine() {
    let scenario = scenarios::wall_detour();
    let mut engine = PathSearchEngine::configure(
        &scenario.grid,
        Cell::new(0, 9),
        Cell::new(9, 9),
        SearchPolicy::default(),
    );
    let _ = engine.search();

    engine.reconfigure(scenario.destination, scenario.start);
    let reused = engine.search_with_report().to_canonical_json_bytes().unwrap();
    assert_eq!(reused, report_bytes(&scenario));

    // Searching twice without reconfiguring gives the same answer.
    let again = engine.search_with_report().to_canonical_json_bytes().unwrap();
    assert_eq!(again, reused);
}
