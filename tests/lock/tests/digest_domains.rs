//! Every digest a route bundle carries is computed under the domain that
//! names its artifact, and under no other.

use gridwalk_harness::bundle::{SCENARIO_ARTIFACT, SEARCH_REPORT_ARTIFACT, WAYPOINTS_ARTIFACT};
use gridwalk_harness::runner::execute;
use gridwalk_harness::scenarios;
use gridwalk_kernel::proof::canon::canonical_json_bytes;
use gridwalk_kernel::proof::hash::{canonical_hash, ContentHash, HashDomain};

/// Assert `declared` is the digest of `bytes` under `owner` and differs
/// from the digest under every other domain.
fn assert_owned_by(owner: HashDomain, bytes: &[u8], declared: &str, what: &str) {
    for &domain in HashDomain::ALL {
        let digest = canonical_hash(domain, bytes);
        if domain == owner {
            assert_eq!(digest.as_str(), declared, "{what}: not a {owner} digest");
        } else {
            assert_ne!(digest.as_str(), declared, "{what}: also matches {domain}");
        }
    }
}

fn field<'a>(json: &'a serde_json::Value, name: &str) -> &'a str {
    json[name].as_str().unwrap_or_else(|| panic!("missing {name}"))
}

// ---------------------------------------------------------------------------
// waypoints.json bindings
// ---------------------------------------------------------------------------

#[test]
fn waypoint_bindings_use_their_own_domains() {
    for scenario in scenarios::builtin() {
        let run = execute(&scenario).unwrap();
        let content = |name: &str| run.bundle.artifact(name).unwrap().content.clone();
        let waypoints: serde_json::Value =
            serde_json::from_slice(&content(WAYPOINTS_ARTIFACT)).unwrap();

        assert_owned_by(
            HashDomain::Scenario,
            &content(SCENARIO_ARTIFACT),
            field(&waypoints, "scenario_digest"),
            &scenario.id,
        );
        assert_owned_by(
            HashDomain::SearchReport,
            &content(SEARCH_REPORT_ARTIFACT),
            field(&waypoints, "report_digest"),
            &scenario.id,
        );
        let compressed = canonical_json_bytes(&waypoints["compressed"]).unwrap();
        assert_owned_by(
            HashDomain::Waypoints,
            &compressed,
            field(&waypoints, "waypoints_digest"),
            &scenario.id,
        );
    }
}

#[test]
fn in_memory_report_digest_matches_declared() {
    let run = execute(&scenarios::wall_detour()).unwrap();
    let waypoints: serde_json::Value =
        serde_json::from_slice(&run.bundle.artifact(WAYPOINTS_ARTIFACT).unwrap().content).unwrap();
    assert_eq!(
        run.report.digest().unwrap().as_str(),
        field(&waypoints, "report_digest")
    );
}

// ---------------------------------------------------------------------------
// scenario.json policy echo
// ---------------------------------------------------------------------------

#[test]
fn policy_digest_uses_policy_domain() {
    let mut lenient = scenarios::diagonal_gap();
    lenient.policy = lenient.policy.with_corner_cutting(true);

    let mut seen = Vec::new();
    for scenario in [scenarios::diagonal_gap(), lenient] {
        let run = execute(&scenario).unwrap();
        let json: serde_json::Value =
            serde_json::from_slice(&run.bundle.artifact(SCENARIO_ARTIFACT).unwrap().content).unwrap();
        let policy = canonical_json_bytes(&json["policy"]).unwrap();
        let declared = field(&json, "policy_digest");
        assert_owned_by(HashDomain::SearchPolicy, &policy, declared, "policy");
        seen.push(declared.to_string());
    }
    assert_ne!(seen[0], seen[1], "policy change must change policy_digest");
}

// ---------------------------------------------------------------------------
// Bundle envelope
// ---------------------------------------------------------------------------

#[test]
fn bundle_hashes_use_bundle_domains() {
    let run = execute(&scenarios::switchback_maze(21)).unwrap();
    for artifact in run.bundle.artifacts.values() {
        assert_owned_by(
            HashDomain::BundleArtifact,
            &artifact.content,
            artifact.content_hash.as_str(),
            &artifact.name,
        );
    }
    assert_owned_by(
        HashDomain::BundleDigest,
        &run.bundle.digest_basis,
        run.bundle.digest.as_str(),
        "bundle digest",
    );
}

#[test]
fn same_report_bytes_give_distinct_manifest_and_binding_hashes() {
    let run = execute(&scenarios::open_field(6)).unwrap();
    let report = run.bundle.artifact(SEARCH_REPORT_ARTIFACT).unwrap();
    let binding: ContentHash = run.report.digest().unwrap();
    assert_ne!(report.content_hash, binding);
}

// ---------------------------------------------------------------------------
// No orphan domains
// ---------------------------------------------------------------------------

/// Every domain is produced somewhere in non-test source.
#[test]
fn every_domain_has_a_producer() {
    let roots = [
        concat!(env!("CARGO_MANIFEST_DIR"), "/../../search/src"),
        concat!(env!("CARGO_MANIFEST_DIR"), "/../../harness/src"),
        concat!(env!("CARGO_MANIFEST_DIR"), "/../../benchmarks/src"),
    ];
    let mut production = String::new();
    for root in roots {
        for path in rust_files(std::path::Path::new(root)) {
            let source = std::fs::read_to_string(&path).unwrap();
            // Test modules sit at the bottom of each file.
            let body = source.split("#[cfg(test)]").next().unwrap_or_default();
            production.push_str(body);
        }
    }
    assert!(!production.is_empty(), "no production sources found");

    for domain in HashDomain::ALL {
        let needle = format!("HashDomain::{domain}");
        assert!(production.contains(&needle), "{domain} has no producer");
    }
}

fn rust_files(dir: &std::path::Path) -> Vec<std::path::PathBuf> {
    let mut out = Vec::new();
    let Ok(entries) = std::fs::read_dir(dir) else {
        return out;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            out.extend(rust_files(&path));
        } else if path.extension().is_some_and(|e| e == "rs") {
            out.push(path);
        }
    }
    out
}
