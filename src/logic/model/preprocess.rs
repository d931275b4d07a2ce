//! Preprocessor - the shared fitted transformer
//!
//! One preprocessor serves all five classifiers. It was fitted offline and
//! exported to ONNX; its internal encoding (scaling, one-hot, whatever the
//! pipeline learned) is opaque to the dashboard. The adapter here only feeds
//! it one f32 row in layout order, with the organisation unit replaced by
//! its ordinal code in the fitted vocabulary.

use std::path::Path;

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;

use super::inference::PredictError;
use super::ArtifactError;
use crate::logic::features::layout::FEATURE_COLUMN_COUNT;
use crate::logic::features::record::FeatureRecord;

/// Fitted transformer: FeatureRecord in, fixed-width numeric vector out.
///
/// Trait seam so the dispatcher can run against mock artifacts in tests.
pub trait Preprocessor: Send + Sync {
    fn transform(&self, record: &FeatureRecord) -> Result<Vec<f32>, PredictError>;
}

/// Ordinal code of an organisation unit in the fitted vocabulary.
///
/// The vocabulary order comes from the manifest and mirrors the encoder the
/// preprocessor was fitted with. A unit outside the closed set cannot be
/// encoded and is reported rather than guessed at.
pub fn encode_unit(vocabulary: &[String], unit: &str) -> Result<f32, PredictError> {
    vocabulary
        .iter()
        .position(|known| known == unit)
        .map(|code| code as f32)
        .ok_or_else(|| PredictError::UnknownOrganisationUnit(unit.to_string()))
}

/// ONNX-backed preprocessor.
///
/// `Session::run` needs `&mut self`, so the session sits behind a mutex even
/// though the artifact is logically read-only.
pub struct OnnxPreprocessor {
    session: Mutex<Session>,
    output_name: String,
    vocabulary: Vec<String>,
}

impl OnnxPreprocessor {
    /// Load the preprocessor artifact. Fatal on any failure.
    pub fn load(path: &Path, vocabulary: Vec<String>) -> Result<Self, ArtifactError> {
        let session = Session::builder()
            .map_err(|e| session_error(path, e))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| session_error(path, e))?
            .commit_from_file(path)
            .map_err(|e| session_error(path, e))?;

        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| ArtifactError::Session {
                path: path.to_path_buf(),
                message: "no output defined".to_string(),
            })?;

        log::info!("preprocessor loaded from {}", path.display());

        Ok(Self {
            session: Mutex::new(session),
            output_name,
            vocabulary,
        })
    }

}

impl Preprocessor for OnnxPreprocessor {
    fn transform(&self, record: &FeatureRecord) -> Result<Vec<f32>, PredictError> {
        let unit_code = encode_unit(&self.vocabulary, &record.organisationunitname)?;

        // One row in layout order: unit code, then the numeric columns.
        let mut row = Vec::with_capacity(FEATURE_COLUMN_COUNT);
        row.push(unit_code);
        row.extend_from_slice(&record.numeric_row());

        let input_array = Array2::<f32>::from_shape_vec((1, FEATURE_COLUMN_COUNT), row)
            .map_err(|e| PredictError::Inference(format!("input shape: {e}")))?;

        let input_tensor = Value::from_array(input_array)
            .map_err(|e| PredictError::Inference(format!("input tensor: {e}")))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| PredictError::Inference(format!("preprocessor run: {e}")))?;

        let output = outputs
            .get(&self.output_name)
            .ok_or_else(|| PredictError::Inference("preprocessor produced no output".to_string()))?;

        let (_, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| PredictError::Inference(format!("output extraction: {e}")))?;

        Ok(data.to_vec())
    }
}

fn session_error(path: &Path, e: ort::Error) -> ArtifactError {
    ArtifactError::Session {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocabulary() -> Vec<String> {
        vec![
            "Bakel".to_string(),
            "Dakar Nord".to_string(),
            "Thies".to_string(),
        ]
    }

    #[test]
    fn test_encode_unit_uses_vocabulary_order() {
        let vocab = vocabulary();
        assert_eq!(encode_unit(&vocab, "Bakel").unwrap(), 0.0);
        assert_eq!(encode_unit(&vocab, "Dakar Nord").unwrap(), 1.0);
        assert_eq!(encode_unit(&vocab, "Thies").unwrap(), 2.0);
    }

    #[test]
    fn test_encode_unit_rejects_unknown() {
        let vocab = vocabulary();
        assert!(matches!(
            encode_unit(&vocab, "Atlantis"),
            Err(PredictError::UnknownOrganisationUnit(name)) if name == "Atlantis"
        ));
        assert!(encode_unit(&vocab, "").is_err());
    }
}
