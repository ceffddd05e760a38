//! Bundle directory persistence through the full pipeline:
//! run scenario → write directory → read directory → verify.

use gridwalk_harness::bundle::{verify_bundle, BundleVerifyError, WAYPOINTS_ARTIFACT};
use gridwalk_harness::bundle_dir::{
    read_bundle_dir, verify_bundle_dir, write_bundle_dir, BundleDirReadError, BundleDirVerifyError,
};
use gridwalk_harness::runner::run_scenario;
use gridwalk_harness::scenarios;
use lock_tests::bundle_test_helpers::rebuild_with_waypoints;

// ---------------------------------------------------------------------------
// Round trip
// ---------------------------------------------------------------------------

#[test]
fn roundtrip_produces_equivalent_bundle() {
    for scenario in scenarios::builtin() {
        let bundle = run_scenario(&scenario).unwrap();
        let dir = tempfile::tempdir().unwrap();

        write_bundle_dir(&bundle, dir.path()).unwrap();
        let loaded = read_bundle_dir(dir.path()).unwrap();

        assert_eq!(loaded.digest, bundle.digest, "{}", scenario.id);
        assert_eq!(loaded.manifest, bundle.manifest);
        assert_eq!(loaded.digest_basis, bundle.digest_basis);

        assert_eq!(loaded.artifacts.len(), bundle.artifacts.len());
        for (name, artifact) in &bundle.artifacts {
            let loaded_artifact = loaded.artifacts.get(name).unwrap();
            assert_eq!(loaded_artifact.content, artifact.content);
            assert_eq!(loaded_artifact.content_hash, artifact.content_hash);
            assert_eq!(loaded_artifact.normative, artifact.normative);
        }
        verify_bundle(&loaded).unwrap();
    }
}

#[test]
fn rewriting_is_idempotent() {
    let bundle = run_scenario(&scenarios::switchback_maze(21)).unwrap();
    let dir = tempfile::tempdir().unwrap();
    write_bundle_dir(&bundle, dir.path()).unwrap();
    write_bundle_dir(&bundle, dir.path()).unwrap();
    verify_bundle_dir(dir.path()).unwrap();
}

// ---------------------------------------------------------------------------
// Fail closed
// ---------------------------------------------------------------------------

#[test]
fn missing_waypoints_file_is_rejected() {
    let bundle = run_scenario(&scenarios::wall_detour()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    write_bundle_dir(&bundle, dir.path()).unwrap();

    std::fs::remove_file(dir.path().join(WAYPOINTS_ARTIFACT)).unwrap();
    let err = read_bundle_dir(dir.path()).unwrap_err();
    assert!(matches!(err, BundleDirReadError::MissingArtifact { name } if name == WAYPOINTS_ARTIFACT));
}

#[test]
fn edited_artifact_file_fails_verification() {
    let bundle = run_scenario(&scenarios::wall_detour()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    write_bundle_dir(&bundle, dir.path()).unwrap();

    std::fs::write(dir.path().join(WAYPOINTS_ARTIFACT), b"{}").unwrap();
    assert!(matches!(
        verify_bundle_dir(dir.path()),
        Err(BundleDirVerifyError::VerifyError(BundleVerifyError::ContentHashMismatch { artifact, .. }))
            if artifact == WAYPOINTS_ARTIFACT
    ));
}

#[test]
fn stray_file_is_rejected() {
    let bundle = run_scenario(&scenarios::open_field(4)).unwrap();
    let dir = tempfile::tempdir().unwrap();
    write_bundle_dir(&bundle, dir.path()).unwrap();

    std::fs::write(dir.path().join("notes.txt"), b"hello").unwrap();
    assert!(matches!(
        verify_bundle_dir(dir.path()),
        Err(BundleDirVerifyError::ReadError(BundleDirReadError::ExtraFile { name })) if name == "notes.txt"
    ));
}

#[test]
fn self_consistent_but_wrong_waypoints_fail_verification() {
    let bundle = run_scenario(&scenarios::wall_detour()).unwrap();
    let forged = rebuild_with_waypoints(&bundle, serde_json::json!([]));
    let dir = tempfile::tempdir().unwrap();
    write_bundle_dir(&forged, dir.path()).unwrap();

    // Hashes and digest agree with the files, so reading succeeds...
    read_bundle_dir(dir.path()).unwrap();
    // ...but the route bindings do not.
    assert!(matches!(
        verify_bundle_dir(dir.path()),
        Err(BundleDirVerifyError::VerifyError(BundleVerifyError::WaypointsMismatch))
    ));
}
