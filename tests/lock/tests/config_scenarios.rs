//! Scenarios loaded from JSON configuration run end to end.

use gridwalk_harness::bundle_dir::{verify_bundle_dir, write_bundle_dir};
use gridwalk_harness::config::{ConfigError, ScenarioConfig};
use gridwalk_harness::runner::{execute, run_scenario};
use gridwalk_harness::scenarios;
use gridwalk_harness::worlds::tile_grid::GridParseError;
use gridwalk_kernel::grid::cell::Cell;
use gridwalk_search::report::TerminationReason;

fn corridor() -> serde_json::Value {
    serde_json::json!({
        "id": "corridor",
        "rows": ["S...#", "###.#", "....D"],
        "policy": { "allow_diagonal_movement": false, "max_expansions": 5000 }
    })
}

#[test]
fn loaded_config_runs_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("corridor.json");
    std::fs::write(&path, serde_json::to_vec_pretty(&corridor()).unwrap()).unwrap();

    let scenario = ScenarioConfig::load(&path).unwrap().into_scenario().unwrap();
    assert_eq!(scenario.start, Cell::new(0, 0));
    assert_eq!(scenario.destination, Cell::new(4, 2));
    assert!(!scenario.policy.allow_diagonal_movement);
    assert_eq!(scenario.policy.max_expansions, 5000);

    let run = execute(&scenario).unwrap();
    assert_eq!(run.report.termination, TerminationReason::DestinationReached);
    assert_eq!(run.report.path.len(), 7);
    let corners: Vec<Cell> = run.compressed.iter().map(|n| n.cell()).collect();
    assert_eq!(
        corners,
        vec![Cell::new(0, 0), Cell::new(3, 0), Cell::new(3, 2), Cell::new(4, 2)]
    );

    let out = dir.path().join("bundle");
    write_bundle_dir(&run.bundle, &out).unwrap();
    verify_bundle_dir(&out).unwrap();
}

#[test]
fn config_matching_a_builtin_reproduces_its_bundle() {
    let builtin = scenarios::diagonal_gap();
    let rows: Vec<String> = builtin.grid.render(&[]).lines().map(str::to_string).collect();
    let value = serde_json::json!({ "id": builtin.id, "rows": rows });

    let loaded = ScenarioConfig::from_json_value(&value)
        .unwrap()
        .into_scenario()
        .unwrap();
    assert_eq!(
        run_scenario(&loaded).unwrap().digest,
        run_scenario(&builtin).unwrap().digest
    );
}

#[test]
fn bad_configs_fail_before_searching() {
    let unknown = ScenarioConfig::from_json_slice(br#"{"id":"x","rows":["SD"],"heuristic":"manhattan"}"#);
    assert!(matches!(unknown, Err(ConfigError::UnknownField { .. })));

    let no_destination = ScenarioConfig::from_json_slice(br#"{"id":"x","rows":["S.."]}"#)
        .unwrap()
        .into_scenario();
    assert!(matches!(
        no_destination,
        Err(ConfigError::Grid(GridParseError::MissingMarker { marker: 'D' }))
    ));

    let missing = ScenarioConfig::load(std::path::Path::new("/nonexistent/gridwalk.json"));
    assert!(matches!(missing, Err(ConfigError::Io { .. })));
}
