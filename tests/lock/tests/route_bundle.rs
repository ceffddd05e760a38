//! Route bundle lock tests: every built-in scenario verifies, and each
//! binding in `waypoints.json` fails closed when its target is altered.

use gridwalk_harness::bundle::{
    verify_bundle, BundleVerifyError, RouteBundle, ROUTE_RENDER_ARTIFACT, SCENARIO_ARTIFACT,
    SEARCH_REPORT_ARTIFACT, WAYPOINTS_ARTIFACT,
};
use gridwalk_harness::runner::{execute, run_scenario};
use gridwalk_harness::scenarios;
use gridwalk_kernel::proof::hash::{canonical_hash, HashDomain};
use lock_tests::bundle_test_helpers::{
    rebuild_with_modified_json, rebuild_with_waypoints, rebuild_without_artifact,
};

fn json(bundle: &RouteBundle, name: &str) -> serde_json::Value {
    serde_json::from_slice(&bundle.artifact(name).unwrap().content).unwrap()
}

// ---------------------------------------------------------------------------
// Positive
// ---------------------------------------------------------------------------

#[test]
fn every_builtin_bundle_verifies() {
    for scenario in scenarios::builtin() {
        let bundle = run_scenario(&scenario).unwrap();
        verify_bundle(&bundle).unwrap_or_else(|e| panic!("{}: {e}", scenario.id));
        for name in [
            SCENARIO_ARTIFACT,
            SEARCH_REPORT_ARTIFACT,
            WAYPOINTS_ARTIFACT,
            ROUTE_RENDER_ARTIFACT,
        ] {
            assert!(bundle.artifact(name).is_some(), "{}: missing {name}", scenario.id);
        }
    }
}

#[test]
fn waypoints_artifact_mirrors_run() {
    for scenario in scenarios::builtin() {
        let run = execute(&scenario).unwrap();
        let waypoints = json(&run.bundle, WAYPOINTS_ARTIFACT);

        let declared = waypoints["compressed"].as_array().unwrap();
        assert_eq!(declared.len(), run.compressed.len(), "{}", scenario.id);
        for (value, node) in declared.iter().zip(&run.compressed) {
            assert_eq!(value["x"], node.x);
            assert_eq!(value["y"], node.y);
        }
        assert_eq!(
            waypoints["termination_reason"],
            run.report.termination.as_str()
        );

        // Collinear points add no length.
        let full = waypoints["path_length_milli"].as_i64().unwrap();
        let short = waypoints["compressed_length_milli"].as_i64().unwrap();
        assert!((full - short).abs() <= 1, "{}: {full} vs {short}", scenario.id);
    }
}

#[test]
fn unreachable_bundle_carries_empty_waypoints() {
    let bundle = run_scenario(&scenarios::sealed_room()).unwrap();
    let waypoints = json(&bundle, WAYPOINTS_ARTIFACT);
    assert_eq!(waypoints["compressed"], serde_json::json!([]));
    assert_eq!(waypoints["termination_reason"], "frontier_exhausted");
    assert_eq!(waypoints["path_length_milli"], 0);
}

#[test]
fn route_render_is_observational() {
    let bundle = run_scenario(&scenarios::wall_detour()).unwrap();
    let render = bundle.artifact(ROUTE_RENDER_ARTIFACT).unwrap();
    assert!(!render.normative);
    let text = String::from_utf8(render.content.clone()).unwrap();
    assert!(text.contains('S') && text.contains('D') && text.contains('*'));

    let without = rebuild_without_artifact(&bundle, ROUTE_RENDER_ARTIFACT);
    assert_eq!(without.digest, bundle.digest);
    verify_bundle(&without).unwrap();
}

// ---------------------------------------------------------------------------
// Negative
// ---------------------------------------------------------------------------

#[test]
fn raw_content_tamper_is_hash_mismatch() {
    let mut bundle = run_scenario(&scenarios::wall_detour()).unwrap();
    let report = bundle.artifacts.get_mut(SEARCH_REPORT_ARTIFACT).unwrap();
    report.content.push(b' ');
    assert!(matches!(
        verify_bundle(&bundle),
        Err(BundleVerifyError::ContentHashMismatch { artifact, .. }) if artifact == SEARCH_REPORT_ARTIFACT
    ));
}

#[test]
fn edited_scenario_breaks_scenario_binding() {
    let bundle = run_scenario(&scenarios::wall_detour()).unwrap();
    let edited = rebuild_with_modified_json(&bundle, SCENARIO_ARTIFACT, |json| {
        json["id"] = serde_json::json!("somewhere_else");
    });
    assert!(matches!(
        verify_bundle(&edited),
        Err(BundleVerifyError::BindingMismatch { field, .. }) if field == "scenario_digest"
    ));
}

#[test]
fn edited_report_breaks_report_binding() {
    let bundle = run_scenario(&scenarios::wall_detour()).unwrap();
    let edited = rebuild_with_modified_json(&bundle, SEARCH_REPORT_ARTIFACT, |json| {
        json["stats"]["expansions"] = serde_json::json!(1);
    });
    assert!(matches!(
        verify_bundle(&edited),
        Err(BundleVerifyError::BindingMismatch { field, .. }) if field == "report_digest"
    ));
}

#[test]
fn rebound_report_with_other_endpoint_is_scenario_mismatch() {
    let bundle = run_scenario(&scenarios::wall_detour()).unwrap();
    let edited = rebuild_with_modified_json(&bundle, SEARCH_REPORT_ARTIFACT, |json| {
        json["destination"] = serde_json::json!([0, 9]);
    });
    let report_digest = canonical_hash(
        HashDomain::SearchReport,
        &edited.artifact(SEARCH_REPORT_ARTIFACT).unwrap().content,
    );
    let rebound = rebuild_with_modified_json(&edited, WAYPOINTS_ARTIFACT, |json| {
        json["report_digest"] = serde_json::json!(report_digest.as_str());
    });
    assert!(matches!(
        verify_bundle(&rebound),
        Err(BundleVerifyError::ScenarioReportMismatch { field }) if field == "destination"
    ));
}

#[test]
fn stale_waypoints_digest_is_binding_mismatch() {
    let bundle = run_scenario(&scenarios::wall_detour()).unwrap();
    let edited = rebuild_with_modified_json(&bundle, WAYPOINTS_ARTIFACT, |json| {
        json["compressed"] = serde_json::json!([]);
    });
    assert!(matches!(
        verify_bundle(&edited),
        Err(BundleVerifyError::BindingMismatch { field, .. }) if field == "waypoints_digest"
    ));
}

#[test]
fn uncompressed_waypoints_are_rejected() {
    let bundle = run_scenario(&scenarios::wall_detour()).unwrap();
    let full_path = json(&bundle, SEARCH_REPORT_ARTIFACT)["path"].clone();
    assert!(full_path.as_array().unwrap().len() > 2);

    let edited = rebuild_with_waypoints(&bundle, full_path);
    assert!(matches!(
        verify_bundle(&edited),
        Err(BundleVerifyError::WaypointsMismatch)
    ));
}

#[test]
fn dropped_interior_waypoint_is_rejected() {
    let bundle = run_scenario(&scenarios::wall_detour()).unwrap();
    let mut compressed = json(&bundle, WAYPOINTS_ARTIFACT)["compressed"].clone();
    let list = compressed.as_array_mut().unwrap();
    assert!(list.len() > 2);
    list.remove(1);

    let edited = rebuild_with_waypoints(&bundle, compressed);
    assert!(matches!(
        verify_bundle(&edited),
        Err(BundleVerifyError::WaypointsMismatch)
    ));
}

#[test]
fn waypoints_that_are_not_a_list_are_malformed() {
    let bundle = run_scenario(&scenarios::open_field(4)).unwrap();
    let edited = rebuild_with_waypoints(&bundle, serde_json::json!({"x": 0}));
    assert!(matches!(
        verify_bundle(&edited),
        Err(BundleVerifyError::ArtifactMalformed { artifact, .. }) if artifact == WAYPOINTS_ARTIFACT
    ));
}
