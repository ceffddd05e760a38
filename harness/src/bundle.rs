//! In-memory route bundle: the output of a scenario run.
//!
//! No file I/O in this module. The bundle is a deterministic in-memory
//! representation that can be inspected programmatically.
//!
//! # Normative vs observational artifacts
//!
//! Each artifact is tagged `normative` (participates in bundle digest)
//! or observational (present in the manifest but excluded from digest).
//!
//! `route.txt` is observational: it is a human-readable rendering of the
//! grid with the route overlaid, derived entirely from normative artifacts.
//!
//! The bundle digest is computed over the **digest basis**: a canonical
//! JSON projection of normative artifact hashes only.

use std::collections::BTreeMap;

use gridwalk_kernel::grid::cell::Cell;
use gridwalk_kernel::proof::canon::{canonical_json_bytes, is_canonical};
use gridwalk_kernel::proof::hash::{canonical_hash, ContentHash, HashDomain};
use gridwalk_search::compress::compress_cells;

/// Domain prefix for bundle artifact content hashing.
pub const DOMAIN_BUNDLE_ARTIFACT: HashDomain = HashDomain::BundleArtifact;

/// Domain prefix for bundle digest computation.
pub const DOMAIN_BUNDLE_DIGEST: HashDomain = HashDomain::BundleDigest;

/// Scenario fixture: grid rows, endpoints, policy.
pub const SCENARIO_ARTIFACT: &str = "scenario.json";
/// Full search report: termination, counters, path, expansion order.
pub const SEARCH_REPORT_ARTIFACT: &str = "search_report.json";
/// Compressed waypoints plus bindings to the scenario and report.
pub const WAYPOINTS_ARTIFACT: &str = "waypoints.json";
/// Grid rendering with the route overlaid (observational).
pub const ROUTE_RENDER_ARTIFACT: &str = "route.txt";

/// A single artifact in the bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleArtifact {
    /// Logical filename (e.g., `"scenario.json"`, `"route.txt"`).
    pub name: String,
    /// Raw bytes of the artifact.
    pub content: Vec<u8>,
    /// Content hash: `canonical_hash(DOMAIN_BUNDLE_ARTIFACT, content)`.
    pub content_hash: ContentHash,
    /// Whether this artifact participates in the bundle digest.
    pub normative: bool,
}

/// The complete artifact bundle from a scenario run.
#[derive(Debug, Clone)]
pub struct RouteBundle {
    /// Artifacts indexed by logical name, in sorted order (`BTreeMap`).
    pub artifacts: BTreeMap<String, BundleArtifact>,
    /// Full manifest: canonical JSON listing all artifacts with normative flags.
    pub manifest: Vec<u8>,
    /// Digest basis: canonical JSON listing normative artifact hashes only.
    pub digest_basis: Vec<u8>,
    /// Bundle digest: `canonical_hash(DOMAIN_BUNDLE_DIGEST, digest_basis)`.
    pub digest: ContentHash,
}

impl RouteBundle {
    /// Artifact by logical name.
    #[must_use]
    pub fn artifact(&self, name: &str) -> Option<&BundleArtifact> {
        self.artifacts.get(name)
    }
}

/// Error building a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleBuildError {
    /// Canonical JSON serialization failed.
    CanonError { detail: String },
    /// Two inputs share a logical name.
    DuplicateArtifact { name: String },
}

impl std::fmt::Display for BundleBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CanonError { detail } => write!(f, "canonical JSON error: {detail}"),
            Self::DuplicateArtifact { name } => write!(f, "duplicate artifact: {name}"),
        }
    }
}

impl std::error::Error for BundleBuildError {}

/// Build a [`RouteBundle`] from `(name, content, normative)` triples.
///
/// Computes content hashes, builds the sorted manifest and digest basis,
/// and derives the bundle digest. All JSON via kernel's
/// `canonical_json_bytes`.
///
/// # Errors
///
/// Returns [`BundleBuildError`] if canonical JSON serialization fails or a
/// name repeats.
pub fn build_bundle(artifacts: Vec<(String, Vec<u8>, bool)>) -> Result<RouteBundle, BundleBuildError> {
    let mut artifact_map = BTreeMap::new();

    for (name, content, normative) in artifacts {
        if artifact_map.contains_key(&name) {
            return Err(BundleBuildError::DuplicateArtifact { name });
        }
        let content_hash = canonical_hash(DOMAIN_BUNDLE_ARTIFACT, &content);
        artifact_map.insert(
            name.clone(),
            BundleArtifact {
                name,
                content,
                content_hash,
                normative,
            },
        );
    }

    let manifest = compute_manifest_bytes(&artifact_map)
        .map_err(|detail| BundleBuildError::CanonError { detail })?;

    let digest_basis = compute_digest_basis_bytes(&artifact_map)
        .map_err(|detail| BundleBuildError::CanonError { detail })?;

    let digest = canonical_hash(DOMAIN_BUNDLE_DIGEST, &digest_basis);

    Ok(RouteBundle {
        artifacts: artifact_map,
        manifest,
        digest_basis,
        digest,
    })
}

/// Error from bundle integrity verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleVerifyError {
    /// An artifact's stored `content_hash` does not match recomputed hash.
    ContentHashMismatch {
        artifact: String,
        expected: String,
        actual: String,
    },
    /// Stored `manifest` bytes do not match recomputed manifest from artifacts.
    ManifestMismatch,
    /// Stored `manifest` bytes are not in canonical JSON form.
    ManifestNotCanonical,
    /// Stored `digest_basis` bytes do not match recomputed normative projection.
    DigestBasisMismatch,
    /// Stored `digest_basis` bytes are not in canonical JSON form.
    DigestBasisNotCanonical,
    /// Stored `digest` does not match recomputed hash of `digest_basis`.
    DigestMismatch { expected: String, actual: String },
    /// A normative JSON artifact is not in canonical JSON form.
    ArtifactNotCanonical { artifact: String },
    /// A route artifact is not valid JSON or lacks a field.
    ArtifactMalformed { artifact: String, detail: String },
    /// A digest declared in `waypoints.json` does not match its target.
    BindingMismatch {
        field: String,
        declared: String,
        recomputed: String,
    },
    /// Report and scenario disagree on endpoints or policy.
    ScenarioReportMismatch { field: String },
    /// Declared compressed waypoints are not the compression of the report path.
    WaypointsMismatch,
}

impl std::fmt::Display for BundleVerifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ContentHashMismatch {
                artifact,
                expected,
                actual,
            } => write!(
                f,
                "content hash mismatch for {artifact}: expected {expected}, got {actual}"
            ),
            Self::ManifestMismatch => write!(f, "manifest does not match artifacts"),
            Self::ManifestNotCanonical => write!(f, "manifest is not canonical JSON"),
            Self::DigestBasisMismatch => write!(f, "digest basis does not match artifacts"),
            Self::DigestBasisNotCanonical => write!(f, "digest basis is not canonical JSON"),
            Self::DigestMismatch { expected, actual } => {
                write!(f, "bundle digest mismatch: expected {expected}, got {actual}")
            }
            Self::ArtifactNotCanonical { artifact } => {
                write!(f, "{artifact} is not canonical JSON")
            }
            Self::ArtifactMalformed { artifact, detail } => {
                write!(f, "{artifact} is malformed: {detail}")
            }
            Self::BindingMismatch {
                field,
                declared,
                recomputed,
            } => write!(
                f,
                "binding {field} mismatch: declared {declared}, recomputed {recomputed}"
            ),
            Self::ScenarioReportMismatch { field } => {
                write!(f, "scenario and search report disagree on {field}")
            }
            Self::WaypointsMismatch => {
                write!(f, "compressed waypoints do not match the report path")
            }
        }
    }
}

impl std::error::Error for BundleVerifyError {}

/// Verify the internal consistency of a bundle.
///
/// This is a pure integrity check; it does NOT rerun the search. It proves:
///
/// 1. Each artifact's `content_hash` matches `canonical_hash(DOMAIN_BUNDLE_ARTIFACT, content)`.
/// 2. `manifest` and `digest_basis` are canonical and match the projections
///    recomputed from the artifacts.
/// 3. `digest` matches `canonical_hash(DOMAIN_BUNDLE_DIGEST, digest_basis)`.
/// 4. Normative JSON artifacts are in canonical form.
/// 5. If `scenario.json`, `search_report.json` and `waypoints.json` are all
///    present: the digests declared in `waypoints.json` match, the report
///    echoes the scenario's endpoints and policy, and the compressed
///    waypoints are exactly the compression of the report's path.
///
/// # Errors
///
/// Returns the first [`BundleVerifyError`] encountered.
pub fn verify_bundle(bundle: &RouteBundle) -> Result<(), BundleVerifyError> {
    for artifact in bundle.artifacts.values() {
        let recomputed = canonical_hash(DOMAIN_BUNDLE_ARTIFACT, &artifact.content);
        if recomputed != artifact.content_hash {
            return Err(BundleVerifyError::ContentHashMismatch {
                artifact: artifact.name.clone(),
                expected: artifact.content_hash.as_str().to_string(),
                actual: recomputed.as_str().to_string(),
            });
        }
    }

    if !is_canonical(&bundle.manifest) {
        return Err(BundleVerifyError::ManifestNotCanonical);
    }
    let manifest = compute_manifest_bytes(&bundle.artifacts)
        .map_err(|_| BundleVerifyError::ManifestMismatch)?;
    if manifest != bundle.manifest {
        return Err(BundleVerifyError::ManifestMismatch);
    }

    if !is_canonical(&bundle.digest_basis) {
        return Err(BundleVerifyError::DigestBasisNotCanonical);
    }
    let digest_basis = compute_digest_basis_bytes(&bundle.artifacts)
        .map_err(|_| BundleVerifyError::DigestBasisMismatch)?;
    if digest_basis != bundle.digest_basis {
        return Err(BundleVerifyError::DigestBasisMismatch);
    }

    let digest = canonical_hash(DOMAIN_BUNDLE_DIGEST, &bundle.digest_basis);
    if digest != bundle.digest {
        return Err(BundleVerifyError::DigestMismatch {
            expected: bundle.digest.as_str().to_string(),
            actual: digest.as_str().to_string(),
        });
    }

    for artifact in bundle.artifacts.values() {
        if artifact.normative
            && artifact.name.ends_with(".json")
            && !is_canonical(&artifact.content)
        {
            return Err(BundleVerifyError::ArtifactNotCanonical {
                artifact: artifact.name.clone(),
            });
        }
    }

    verify_route_bindings(bundle)
}

/// Recompute manifest bytes from the artifact map.
fn compute_manifest_bytes(artifacts: &BTreeMap<String, BundleArtifact>) -> Result<Vec<u8>, String> {
    let manifest_artifacts: Vec<serde_json::Value> = artifacts
        .values()
        .map(|a| {
            serde_json::json!({
                "content_hash": a.content_hash.as_str(),
                "name": a.name,
                "normative": a.normative,
            })
        })
        .collect();

    let manifest_value = serde_json::json!({
        "artifacts": manifest_artifacts,
        "schema_version": "bundle.v1",
    });

    canonical_json_bytes(&manifest_value).map_err(|e| format!("{e}"))
}

/// Recompute digest basis bytes from normative artifacts only.
fn compute_digest_basis_bytes(
    artifacts: &BTreeMap<String, BundleArtifact>,
) -> Result<Vec<u8>, String> {
    let normative_artifacts: Vec<serde_json::Value> = artifacts
        .values()
        .filter(|a| a.normative)
        .map(|a| {
            serde_json::json!({
                "content_hash": a.content_hash.as_str(),
                "name": a.name,
            })
        })
        .collect();

    let digest_basis_value = serde_json::json!({
        "artifacts": normative_artifacts,
        "schema_version": "bundle_digest_basis.v1",
    });

    canonical_json_bytes(&digest_basis_value).map_err(|e| format!("{e}"))
}

fn verify_route_bindings(bundle: &RouteBundle) -> Result<(), BundleVerifyError> {
    let (Some(scenario), Some(report), Some(waypoints)) = (
        bundle.artifact(SCENARIO_ARTIFACT),
        bundle.artifact(SEARCH_REPORT_ARTIFACT),
        bundle.artifact(WAYPOINTS_ARTIFACT),
    ) else {
        return Ok(());
    };

    let scenario_json = parse_artifact(scenario)?;
    let report_json = parse_artifact(report)?;
    let waypoints_json = parse_artifact(waypoints)?;

    check_binding(
        &waypoints_json,
        "scenario_digest",
        &canonical_hash(HashDomain::Scenario, &scenario.content),
    )?;
    check_binding(
        &waypoints_json,
        "report_digest",
        &canonical_hash(HashDomain::SearchReport, &report.content),
    )?;

    for field in ["start", "destination", "policy"] {
        if scenario_json.get(field).is_none() || scenario_json.get(field) != report_json.get(field) {
            return Err(BundleVerifyError::ScenarioReportMismatch {
                field: field.to_string(),
            });
        }
    }

    let compressed = waypoints_json
        .get("compressed")
        .ok_or_else(|| malformed(WAYPOINTS_ARTIFACT, "missing \"compressed\""))?;
    let compressed_bytes = canonical_json_bytes(compressed)
        .map_err(|e| malformed(WAYPOINTS_ARTIFACT, &format!("{e}")))?;
    check_binding(
        &waypoints_json,
        "waypoints_digest",
        &canonical_hash(HashDomain::Waypoints, &compressed_bytes),
    )?;

    let path = node_cells(SEARCH_REPORT_ARTIFACT, report_json.get("path"))?;
    let declared = node_cells(WAYPOINTS_ARTIFACT, Some(compressed))?;
    if compress_cells(&path) != declared {
        return Err(BundleVerifyError::WaypointsMismatch);
    }

    Ok(())
}

fn parse_artifact(artifact: &BundleArtifact) -> Result<serde_json::Value, BundleVerifyError> {
    serde_json::from_slice(&artifact.content).map_err(|e| malformed(&artifact.name, &format!("{e}")))
}

fn malformed(artifact: &str, detail: &str) -> BundleVerifyError {
    BundleVerifyError::ArtifactMalformed {
        artifact: artifact.to_string(),
        detail: detail.to_string(),
    }
}

fn check_binding(
    waypoints: &serde_json::Value,
    field: &str,
    recomputed: &ContentHash,
) -> Result<(), BundleVerifyError> {
    let declared = waypoints
        .get(field)
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| malformed(WAYPOINTS_ARTIFACT, &format!("missing \"{field}\"")))?;
    if declared != recomputed.as_str() {
        return Err(BundleVerifyError::BindingMismatch {
            field: field.to_string(),
            declared: declared.to_string(),
            recomputed: recomputed.as_str().to_string(),
        });
    }
    Ok(())
}

/// Coordinates of a JSON array of waypoint objects.
fn node_cells(
    artifact: &str,
    nodes: Option<&serde_json::Value>,
) -> Result<Vec<Cell>, BundleVerifyError> {
    let nodes = nodes
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| malformed(artifact, "waypoint list is not an array"))?;
    nodes
        .iter()
        .map(|node| {
            let coord = |key: &str| {
                node.get(key)
                    .and_then(serde_json::Value::as_i64)
                    .and_then(|v| i32::try_from(v).ok())
                    .ok_or_else(|| malformed(artifact, &format!("waypoint lacks integer \"{key}\"")))
            };
            Ok(Cell::new(coord("x")?, coord("y")?))
        })
        .collect()
}
