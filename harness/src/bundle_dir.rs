//! Bundle directory persistence: write/read/verify a [`RouteBundle`] on disk.
//!
//! # Directory layout
//!
//! ```text
//! <dir>/
//!   bundle_manifest.json         canonical JSON, full artifact listing
//!   bundle_digest_basis.json     canonical JSON, normative projection only
//!   bundle_digest.txt            ASCII digest string ("sha256:...")
//!   scenario.json                normative
//!   search_report.json           normative
//!   waypoints.json               normative
//!   route.txt                    observational
//! ```
//!
//! The directory path is never part of any hash surface. The manifest's
//! declared list is the source of truth for which files belong.
//!
//! # Fail-closed semantics
//!
//! - Missing metadata or declared artifact files
//! - Extra undeclared files
//! - Artifact names that are not plain file names
//! - Stored digest not matching the digest basis

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use gridwalk_kernel::proof::hash::{canonical_hash, ContentHash};

use crate::bundle::{verify_bundle, BundleArtifact, BundleVerifyError, RouteBundle, DOMAIN_BUNDLE_DIGEST};

const MANIFEST_FILENAME: &str = "bundle_manifest.json";
const DIGEST_BASIS_FILENAME: &str = "bundle_digest_basis.json";
const DIGEST_FILENAME: &str = "bundle_digest.txt";
const METADATA_FILENAMES: [&str; 3] = [MANIFEST_FILENAME, DIGEST_BASIS_FILENAME, DIGEST_FILENAME];

/// Prefix of in-flight files written by [`write_bundle_dir`].
const TEMP_PREFIX: &str = ".tmp_";

/// Error writing a bundle directory.
#[derive(Debug)]
pub enum BundleDirWriteError {
    /// I/O error during write.
    Io { detail: String },
    /// An artifact name would escape the directory or collide with metadata.
    InvalidArtifactName { name: String },
}

impl std::fmt::Display for BundleDirWriteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { detail } => write!(f, "I/O error: {detail}"),
            Self::InvalidArtifactName { name } => write!(f, "invalid artifact name: {name}"),
        }
    }
}

impl std::error::Error for BundleDirWriteError {}

/// Error reading a bundle directory.
#[derive(Debug)]
pub enum BundleDirReadError {
    /// I/O error during read.
    Io { detail: String },
    /// A required metadata file is missing.
    MissingMetadata { filename: String },
    /// A declared artifact file is missing from the directory.
    MissingArtifact { name: String },
    /// An undeclared file exists in the directory.
    ExtraFile { name: String },
    /// `bundle_manifest.json` is not valid JSON or not the expected shape.
    ManifestParseError { detail: String },
    /// Manifest `schema_version` is not recognized.
    ManifestVersionMismatch { found: String },
    /// An artifact entry in the manifest is missing or has a bad field.
    ManifestEntryInvalid { detail: String },
    /// `bundle_digest.txt` content doesn't match the recomputed digest.
    DigestMismatch { stored: String, recomputed: String },
}

impl std::fmt::Display for BundleDirReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { detail } => write!(f, "I/O error: {detail}"),
            Self::MissingMetadata { filename } => write!(f, "missing metadata file: {filename}"),
            Self::MissingArtifact { name } => write!(f, "missing artifact: {name}"),
            Self::ExtraFile { name } => write!(f, "undeclared extra file: {name}"),
            Self::ManifestParseError { detail } => write!(f, "manifest parse error: {detail}"),
            Self::ManifestVersionMismatch { found } => {
                write!(f, "manifest version mismatch: {found}")
            }
            Self::ManifestEntryInvalid { detail } => write!(f, "manifest entry invalid: {detail}"),
            Self::DigestMismatch { stored, recomputed } => {
                write!(f, "digest mismatch: stored={stored}, recomputed={recomputed}")
            }
        }
    }
}

impl std::error::Error for BundleDirReadError {}

/// Error verifying a bundle directory.
#[derive(Debug)]
pub enum BundleDirVerifyError {
    /// Error reading the directory.
    ReadError(BundleDirReadError),
    /// Bundle integrity verification failed.
    VerifyError(BundleVerifyError),
}

impl std::fmt::Display for BundleDirVerifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReadError(e) => write!(f, "read error: {e}"),
            Self::VerifyError(e) => write!(f, "verify error: {e}"),
        }
    }
}

impl std::error::Error for BundleDirVerifyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ReadError(e) => Some(e),
            Self::VerifyError(e) => Some(e),
        }
    }
}

/// One artifact line of the manifest.
struct ManifestEntry {
    name: String,
    content_hash: ContentHash,
    normative: bool,
}

/// Write a bundle to `dir`, creating it if needed.
///
/// Each file goes through a temp file and a rename, so a crashed write
/// leaves only `.tmp_*` files behind, which readers ignore.
///
/// # Errors
///
/// Returns [`BundleDirWriteError`] on I/O failure or an artifact name that
/// is not a plain file name.
pub fn write_bundle_dir(bundle: &RouteBundle, dir: &Path) -> Result<(), BundleDirWriteError> {
    for name in bundle.artifacts.keys() {
        if !is_plain_artifact_name(name) {
            return Err(BundleDirWriteError::InvalidArtifactName { name: name.clone() });
        }
    }

    std::fs::create_dir_all(dir).map_err(|e| BundleDirWriteError::Io {
        detail: format!("create_dir_all {}: {e}", dir.display()),
    })?;

    for artifact in bundle.artifacts.values() {
        write_atomic(dir, &artifact.name, &artifact.content)?;
    }
    write_atomic(dir, MANIFEST_FILENAME, &bundle.manifest)?;
    write_atomic(dir, DIGEST_BASIS_FILENAME, &bundle.digest_basis)?;
    write_atomic(dir, DIGEST_FILENAME, bundle.digest.as_str().as_bytes())?;

    Ok(())
}

/// Read a bundle directory back into a [`RouteBundle`].
///
/// The stored `bundle_digest.txt` is checked against the digest recomputed
/// from `bundle_digest_basis.json`. Artifact content hashes are taken from
/// the manifest as declared; [`verify_bundle_dir`] rechecks them.
///
/// # Errors
///
/// Returns [`BundleDirReadError`] on any validation failure.
pub fn read_bundle_dir(dir: &Path) -> Result<RouteBundle, BundleDirReadError> {
    let manifest = read_required(dir, MANIFEST_FILENAME)?;
    let digest_basis = read_required(dir, DIGEST_BASIS_FILENAME)?;
    let stored_digest = read_required(dir, DIGEST_FILENAME)?;

    let entries = parse_manifest(&manifest)?;

    let mut artifacts = BTreeMap::new();
    for entry in entries {
        let content = std::fs::read(dir.join(&entry.name)).map_err(|_| {
            BundleDirReadError::MissingArtifact {
                name: entry.name.clone(),
            }
        })?;
        artifacts.insert(
            entry.name.clone(),
            BundleArtifact {
                name: entry.name,
                content,
                content_hash: entry.content_hash,
                normative: entry.normative,
            },
        );
    }

    for filename in list_files(dir)? {
        if !artifacts.contains_key(&filename) && !METADATA_FILENAMES.contains(&filename.as_str()) {
            return Err(BundleDirReadError::ExtraFile { name: filename });
        }
    }

    let digest = canonical_hash(DOMAIN_BUNDLE_DIGEST, &digest_basis);
    let stored = String::from_utf8_lossy(&stored_digest).trim().to_string();
    if digest.as_str() != stored {
        return Err(BundleDirReadError::DigestMismatch {
            stored,
            recomputed: digest.as_str().to_string(),
        });
    }

    Ok(RouteBundle {
        artifacts,
        manifest,
        digest_basis,
        digest,
    })
}

/// Read `dir`, then run [`verify_bundle`] on the result.
///
/// # Errors
///
/// Returns [`BundleDirVerifyError`] on read failure or integrity mismatch.
pub fn verify_bundle_dir(dir: &Path) -> Result<(), BundleDirVerifyError> {
    let bundle = read_bundle_dir(dir).map_err(BundleDirVerifyError::ReadError)?;
    verify_bundle(&bundle).map_err(BundleDirVerifyError::VerifyError)
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn parse_manifest(bytes: &[u8]) -> Result<Vec<ManifestEntry>, BundleDirReadError> {
    let value: serde_json::Value =
        serde_json::from_slice(bytes).map_err(|e| BundleDirReadError::ManifestParseError {
            detail: format!("{e}"),
        })?;

    let version = value["schema_version"].as_str().unwrap_or_default();
    if version != "bundle.v1" {
        return Err(BundleDirReadError::ManifestVersionMismatch {
            found: version.to_string(),
        });
    }

    let listed = value["artifacts"]
        .as_array()
        .ok_or_else(|| BundleDirReadError::ManifestParseError {
            detail: "\"artifacts\" is not an array".into(),
        })?;

    let mut seen = BTreeSet::new();
    let mut entries = Vec::with_capacity(listed.len());
    for item in listed {
        let invalid = |detail: String| BundleDirReadError::ManifestEntryInvalid { detail };

        let name = item["name"]
            .as_str()
            .ok_or_else(|| invalid("missing \"name\"".into()))?
            .to_string();
        if !is_plain_artifact_name(&name) {
            return Err(invalid(format!("not a plain file name: {name}")));
        }
        if !seen.insert(name.clone()) {
            return Err(invalid(format!("duplicate entry: {name}")));
        }
        let content_hash = item["content_hash"]
            .as_str()
            .and_then(ContentHash::parse)
            .ok_or_else(|| invalid(format!("bad \"content_hash\" for {name}")))?;
        let normative = item["normative"]
            .as_bool()
            .ok_or_else(|| invalid(format!("missing \"normative\" for {name}")))?;

        entries.push(ManifestEntry {
            name,
            content_hash,
            normative,
        });
    }
    Ok(entries)
}

/// A single path component that is neither metadata nor a temp file.
fn is_plain_artifact_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(std::path::Component::Normal(_)), None)
    ) && !name.starts_with(TEMP_PREFIX)
        && !METADATA_FILENAMES.contains(&name)
}

fn write_atomic(dir: &Path, name: &str, content: &[u8]) -> Result<(), BundleDirWriteError> {
    let target: PathBuf = dir.join(name);
    let temp = dir.join(format!("{TEMP_PREFIX}{name}"));

    std::fs::write(&temp, content).map_err(|e| BundleDirWriteError::Io {
        detail: format!("write {}: {e}", temp.display()),
    })?;
    std::fs::rename(&temp, &target).map_err(|e| BundleDirWriteError::Io {
        detail: format!("rename {} -> {}: {e}", temp.display(), target.display()),
    })
}

fn read_required(dir: &Path, filename: &str) -> Result<Vec<u8>, BundleDirReadError> {
    std::fs::read(dir.join(filename)).map_err(|_| BundleDirReadError::MissingMetadata {
        filename: filename.to_string(),
    })
}

/// Regular files in `dir`, skipping in-flight temp files.
fn list_files(dir: &Path) -> Result<BTreeSet<String>, BundleDirReadError> {
    let io = |what: &str, e: std::io::Error| BundleDirReadError::Io {
        detail: format!("{what}: {e}"),
    };

    let mut files = BTreeSet::new();
    for entry in std::fs::read_dir(dir).map_err(|e| io("read_dir", e))? {
        let entry = entry.map_err(|e| io("dir entry", e))?;
        if !entry.file_type().map_err(|e| io("file_type", e))?.is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if !name.starts_with(TEMP_PREFIX) {
                files.insert(name.to_string());
            }
        }
    }
    Ok(files)
}
