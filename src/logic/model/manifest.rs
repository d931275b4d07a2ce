//! Artifact Manifest - what the training run shipped
//!
//! `manifest.json` sits next to the ONNX files and records everything the
//! dashboard cannot infer from the binary artifacts themselves: the fitted
//! feature-layout hash, the categorical vocabulary of organisation units,
//! the observed class set of each classifier, and optional SHA-256 checksums
//! for integrity verification.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::ArtifactError;
use crate::logic::disease::Disease;

/// Manifest file name inside the artifact directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Default preprocessor artifact file name.
pub const PREPROCESSOR_FILE: &str = "preprocessor.onnx";

/// The 23 administrative units the original training data covered. Used as
/// the selector fallback when a manifest predates the vocabulary field.
pub const DEFAULT_ORGANISATION_UNITS: &[&str] = &[
    "Bakel",
    "Dakar Centre",
    "Dakar Nord",
    "Dakar Ouest",
    "Dakar Sud",
    "Diamniadio",
    "Diourbel",
    "Fatick",
    "Kaffrine",
    "Kaolack",
    "Kedougou",
    "Kolda",
    "Louga",
    "Matam",
    "Mbour",
    "Pikine",
    "Podor",
    "Rufisque",
    "Saint-Louis",
    "Sedhiou",
    "Tambacounda",
    "Thies",
    "Ziguinchor",
];

/// Top-level manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub schema_version: u32,

    /// Layout hash the artifacts were fitted against. Checked against the
    /// compiled-in layout at load; `None` skips the check (legacy manifests).
    #[serde(default)]
    pub feature_layout_hash: Option<u32>,

    /// Fitted categorical vocabulary, in encoder order.
    #[serde(default)]
    pub organisation_units: Vec<String>,

    pub preprocessor: PreprocessorEntry,

    /// Keyed by disease wire key. Converted to an exhaustive per-disease
    /// table at load; the map never reaches the dispatcher.
    pub classifiers: HashMap<String, ClassifierEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessorEntry {
    /// Defaults to [`PREPROCESSOR_FILE`] when omitted.
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub sha256: Option<String>,
}

impl PreprocessorEntry {
    pub fn file_name(&self) -> String {
        self.file
            .clone()
            .unwrap_or_else(|| PREPROCESSOR_FILE.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierEntry {
    /// Defaults to the naming convention (lowercased disease key embedded in
    /// the file name) when omitted.
    #[serde(default)]
    pub file: Option<String>,
    /// Class labels the classifier observed during training, in the order
    /// `predict_proba` reports them. NOT guaranteed to contain both 0 and 1.
    pub classes: Vec<i64>,
    #[serde(default)]
    pub sha256: Option<String>,
}

impl ClassifierEntry {
    pub fn file_name(&self, disease: Disease) -> String {
        self.file
            .clone()
            .unwrap_or_else(|| disease.artifact_file_name())
    }
}

impl ArtifactManifest {
    /// Read and parse the manifest from an artifact directory.
    pub fn load(artifact_dir: &Path) -> Result<Self, ArtifactError> {
        if !artifact_dir.is_dir() {
            return Err(ArtifactError::DirectoryNotFound(artifact_dir.to_path_buf()));
        }

        let path = artifact_dir.join(MANIFEST_FILE);
        if !path.is_file() {
            return Err(ArtifactError::ManifestNotFound(path));
        }

        let raw = fs::read_to_string(&path).map_err(|source| ArtifactError::Io {
            path: path.clone(),
            source,
        })?;

        let mut manifest: ArtifactManifest =
            serde_json::from_str(&raw).map_err(|source| ArtifactError::MalformedManifest {
                path: path.clone(),
                source,
            })?;

        if manifest.organisation_units.is_empty() {
            log::warn!("manifest carries no organisation units, using built-in defaults");
            manifest.organisation_units = DEFAULT_ORGANISATION_UNITS
                .iter()
                .map(|s| s.to_string())
                .collect();
        }

        Ok(manifest)
    }

    /// Classifier entry for a wire key, or the fatal missing-classifier error.
    pub fn classifier(&self, key: &str) -> Result<&ClassifierEntry, ArtifactError> {
        self.classifiers
            .get(key)
            .ok_or_else(|| ArtifactError::MissingClassifier(key.to_string()))
    }
}

// ============================================================================
// CHECKSUMS
// ============================================================================

/// SHA-256 of a file, lowercase hex.
pub fn file_sha256(path: &Path) -> Result<String, ArtifactError> {
    let bytes = fs::read(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}

/// Verify a file against an optional manifest checksum. `None` skips the
/// check; any mismatch is fatal.
pub fn verify_checksum(path: &Path, expected: Option<&str>) -> Result<(), ArtifactError> {
    let Some(expected) = expected else {
        return Ok(());
    };

    let actual = file_sha256(path)?;
    if !actual.eq_ignore_ascii_case(expected) {
        return Err(ArtifactError::ChecksumMismatch {
            path: path.to_path_buf(),
            expected: expected.to_string(),
            actual,
        });
    }
    Ok(())
}

/// Resolve an artifact file name against the directory, requiring existence.
pub fn resolve_file(artifact_dir: &Path, file: &str) -> Result<PathBuf, ArtifactError> {
    let path = artifact_dir.join(file);
    if !path.is_file() {
        return Err(ArtifactError::FileNotFound(path));
    }
    Ok(path)
}

// ============================================================================
// TESTS
// ============================================================================
