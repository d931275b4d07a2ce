//! Model Module - Artifact Loading & Inference Dispatch
//!
//! Everything fitted offline lives here as opaque artifacts: one shared
//! preprocessor and one classifier per disease, described by a manifest.
//! Loading happens once at startup; the resulting `ArtifactStore` handle is
//! immutable for the process lifetime.

pub mod classifier;
pub mod inference;
pub mod manifest;
pub mod preprocess;
pub mod store;

// Re-export common types
pub use inference::{predict, predict_for_key, PredictError, PredictionOutcome};
pub use store::{ArtifactStore, EngineStatus};

use std::path::PathBuf;
use thiserror::Error;

/// Startup-time artifact failure. Always fatal: the dashboard has no
/// partial-degradation mode.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("manifest not found: {}", .0.display())]
    ManifestNotFound(PathBuf),

    #[error("malformed manifest {}: {}", .path.display(), .source)]
    MalformedManifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("manifest declares no classifier for disease '{0}'")]
    MissingClassifier(String),

    #[error("artifact file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("checksum mismatch for {}: expected {}, got {}", .path.display(), .expected, .actual)]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error(
        "feature layout mismatch: artifacts fitted on hash {fitted:08x}, \
         this build uses {current:08x}"
    )]
    LayoutMismatch { fitted: u32, current: u32 },

    #[error("ONNX session for {}: {}", .path.display(), .message)]
    Session { path: PathBuf, message: String },

    #[error(
        "classifier {} exposes {} outputs, expected label + probabilities",
        .path.display(), .count
    )]
    BadClassifierOutputs { path: PathBuf, count: usize },

    #[error("io error on {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
