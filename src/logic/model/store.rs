//! Artifact Store - process-wide immutable model state
//!
//! Loads the manifest, verifies checksums, opens the preprocessor and the
//! five classifier sessions, and hands back one immutable `ArtifactStore`.
//! The store is created once in `main` and injected into every command via
//! Tauri managed state; nothing mutates it afterwards.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::classifier::{OnnxClassifier, OutbreakClassifier};
use super::manifest::{resolve_file, verify_checksum, ArtifactManifest, MANIFEST_FILE};
use super::preprocess::{OnnxPreprocessor, Preprocessor};
use super::ArtifactError;
use crate::logic::disease::{Disease, DISEASE_COUNT};
use crate::logic::features::layout::{layout_hash, LayoutInfo};

/// All loaded artifacts plus request counters for the status panel.
pub struct ArtifactStore {
    preprocessor: Box<dyn Preprocessor>,
    /// Indexed by `Disease::index()`; always exactly DISEASE_COUNT entries.
    classifiers: Vec<Box<dyn OutbreakClassifier>>,
    class_sets: Vec<Vec<i64>>,
    organisation_units: Vec<String>,
    artifact_dir: PathBuf,
    loaded_at: DateTime<Utc>,
    prediction_count: AtomicU64,
    latency_sum_us: AtomicU64,
}

impl ArtifactStore {
    /// Load everything from an artifact directory. Any failure here is fatal
    /// to startup: there is no partial-degradation mode.
    pub fn load(artifact_dir: &Path) -> Result<Self, ArtifactError> {
        log::info!("loading artifacts from {}", artifact_dir.display());

        let manifest = ArtifactManifest::load(artifact_dir)?;

        // The artifacts must have been fitted on the schema this build
        // compiles in.
        if let Some(fitted) = manifest.feature_layout_hash {
            let current = layout_hash();
            if fitted != current {
                return Err(ArtifactError::LayoutMismatch { fitted, current });
            }
        } else {
            log::warn!("manifest carries no layout hash, skipping schema check");
        }

        let preprocessor_path = resolve_file(artifact_dir, &manifest.preprocessor.file_name())?;
        verify_checksum(&preprocessor_path, manifest.preprocessor.sha256.as_deref())?;
        let preprocessor =
            OnnxPreprocessor::load(&preprocessor_path, manifest.organisation_units.clone())?;

        let mut classifiers: Vec<Box<dyn OutbreakClassifier>> =
            Vec::with_capacity(DISEASE_COUNT);
        let mut class_sets = Vec::with_capacity(DISEASE_COUNT);
        for disease in Disease::ALL {
            let entry = manifest.classifier(disease.key())?;
            let path = resolve_file(artifact_dir, &entry.file_name(disease))?;
            verify_checksum(&path, entry.sha256.as_deref())?;

            if !entry.classes.contains(&1) {
                log::warn!(
                    "{}: classifier never observed a positive example, \
                     outbreak probability will always be 0.0",
                    disease.key()
                );
            }

            class_sets.push(entry.classes.clone());
            classifiers.push(Box::new(OnnxClassifier::load(&path, entry.classes.clone())?));
        }

        log::info!(
            "artifact store ready: {} classifiers, {} organisation units",
            classifiers.len(),
            manifest.organisation_units.len()
        );

        Ok(Self {
            preprocessor: Box::new(preprocessor),
            classifiers,
            class_sets,
            organisation_units: manifest.organisation_units,
            artifact_dir: artifact_dir.to_path_buf(),
            loaded_at: Utc::now(),
            prediction_count: AtomicU64::new(0),
            latency_sum_us: AtomicU64::new(0),
        })
    }

    /// Build a store from explicit parts. Test seam: lets dispatcher tests
    /// inject mock artifacts without touching ONNX.
    #[cfg(test)]
    pub(crate) fn from_parts(
        preprocessor: Box<dyn Preprocessor>,
        classifiers: Vec<Box<dyn OutbreakClassifier>>,
        organisation_units: Vec<String>,
    ) -> Self {
        assert_eq!(classifiers.len(), DISEASE_COUNT);
        let class_sets = classifiers.iter().map(|c| c.classes().to_vec()).collect();
        Self {
            preprocessor,
            classifiers,
            class_sets,
            organisation_units,
            artifact_dir: PathBuf::from("<test>"),
            loaded_at: Utc::now(),
            prediction_count: AtomicU64::new(0),
            latency_sum_us: AtomicU64::new(0),
        }
    }

    pub fn preprocessor(&self) -> &dyn Preprocessor {
        &*self.preprocessor
    }

    pub fn classifier(&self, disease: Disease) -> &dyn OutbreakClassifier {
        &*self.classifiers[disease.index()]
    }

    pub fn organisation_units(&self) -> &[String] {
        &self.organisation_units
    }

    /// Record one completed prediction for the status panel.
    pub fn record_prediction(&self, latency_us: u64) {
        self.prediction_count.fetch_add(1, Ordering::Relaxed);
        self.latency_sum_us.fetch_add(latency_us, Ordering::Relaxed);
    }

    /// Re-hash every artifact file against the manifest. Exposed as a
    /// command so the UI can surface tampering after startup.
    pub fn verify_checksums(&self) -> Result<(), ArtifactError> {
        let manifest = ArtifactManifest::load(&self.artifact_dir)?;
        let path = resolve_file(&self.artifact_dir, &manifest.preprocessor.file_name())?;
        verify_checksum(&path, manifest.preprocessor.sha256.as_deref())?;
        for disease in Disease::ALL {
            let entry = manifest.classifier(disease.key())?;
            let path = resolve_file(&self.artifact_dir, &entry.file_name(disease))?;
            verify_checksum(&path, entry.sha256.as_deref())?;
        }
        Ok(())
    }

    pub fn status(&self) -> EngineStatus {
        let count = self.prediction_count.load(Ordering::Relaxed);
        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        let avg = if count > 0 {
            (sum as f32 / count as f32) / 1000.0
        } else {
            0.0
        };

        EngineStatus {
            artifact_dir: self.artifact_dir.display().to_string(),
            manifest_file: MANIFEST_FILE.to_string(),
            loaded_at: self.loaded_at.to_rfc3339(),
            inference_device: "ONNX Runtime (CPU)".to_string(),
            layout: LayoutInfo::current(),
            diseases: Disease::ALL
                .into_iter()
                .map(|d| DiseaseStatus {
                    key: d.key().to_string(),
                    display_name: d.display_name(),
                    classes: self.class_sets[d.index()].clone(),
                })
                .collect(),
            organisation_unit_count: self.organisation_units.len(),
            prediction_count: count,
            avg_latency_ms: avg,
        }
    }
}

// ============================================================================
// STATUS
// ============================================================================

/// Engine status for the UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub artifact_dir: String,
    pub manifest_file: String,
    pub loaded_at: String,
    pub inference_device: String,
    pub layout: LayoutInfo,
    pub diseases: Vec<DiseaseStatus>,
    pub organisation_unit_count: usize,
    pub prediction_count: u64,
    pub avg_latency_ms: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiseaseStatus {
    pub key: String,
    pub display_name: String,
    pub classes: Vec<i64>,
}

// ============================================================================
// TESTS
// ============================================================================
