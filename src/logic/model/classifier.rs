//! Classifier - one fitted binary model per disease
//!
//! Each artifact is a random-forest classifier exported to ONNX with two
//! outputs: the predicted label (int64) and the class-probability tensor.
//! The probability columns follow the observed class order recorded in the
//! manifest, which is NOT guaranteed to contain both 0 and 1.

use std::path::Path;

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;

use super::inference::PredictError;
use super::ArtifactError;

/// Fitted binary classifier over preprocessed feature vectors.
///
/// Trait seam so the dispatcher can run against mock artifacts in tests.
pub trait OutbreakClassifier: Send + Sync {
    /// Class labels observed during training, in probability-column order.
    fn classes(&self) -> &[i64];

    /// Predicted label for one feature vector (0 or 1).
    fn predict(&self, features: &[f32]) -> Result<i64, PredictError>;

    /// Probability distribution over [`classes`](Self::classes).
    fn predict_proba(&self, features: &[f32]) -> Result<Vec<f32>, PredictError>;
}

/// ONNX-backed classifier.
///
/// `Session::run` needs `&mut self`, so the session sits behind a mutex even
/// though the artifact is logically read-only.
pub struct OnnxClassifier {
    session: Mutex<Session>,
    classes: Vec<i64>,
    label_output: String,
    proba_output: String,
}

impl OnnxClassifier {
    /// Load a classifier artifact. Expects the sklearn-onnx output layout:
    /// label first, probabilities second. Fatal on any failure.
    pub fn load(path: &Path, classes: Vec<i64>) -> Result<Self, ArtifactError> {
        let session = Session::builder()
            .map_err(|e| session_error(path, e))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| session_error(path, e))?
            .commit_from_file(path)
            .map_err(|e| session_error(path, e))?;

        if session.outputs.len() < 2 {
            return Err(ArtifactError::BadClassifierOutputs {
                path: path.to_path_buf(),
                count: session.outputs.len(),
            });
        }
        let label_output = session.outputs[0].name.clone();
        let proba_output = session.outputs[1].name.clone();

        log::info!(
            "classifier loaded from {} (classes {:?})",
            path.display(),
            classes
        );

        Ok(Self {
            session: Mutex::new(session),
            classes,
            label_output,
            proba_output,
        })
    }
}

fn input_array(features: &[f32]) -> Result<Array2<f32>, PredictError> {
    Array2::<f32>::from_shape_vec((1, features.len()), features.to_vec())
        .map_err(|e| PredictError::Inference(format!("input shape: {e}")))
}

impl OutbreakClassifier for OnnxClassifier {
    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn predict(&self, features: &[f32]) -> Result<i64, PredictError> {
        let tensor = Value::from_array(input_array(features)?)
            .map_err(|e| PredictError::Inference(format!("input tensor: {e}")))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![tensor])
            .map_err(|e| PredictError::Inference(format!("classifier run: {e}")))?;

        let output = outputs.get(&self.label_output).ok_or_else(|| {
            PredictError::Inference(format!("missing output '{}'", self.label_output))
        })?;

        let (_, labels) = output
            .try_extract_tensor::<i64>()
            .map_err(|e| PredictError::Inference(format!("label extraction: {e}")))?;

        labels
            .first()
            .copied()
            .ok_or_else(|| PredictError::Inference("empty label output".to_string()))
    }

    fn predict_proba(&self, features: &[f32]) -> Result<Vec<f32>, PredictError> {
        let tensor = Value::from_array(input_array(features)?)
            .map_err(|e| PredictError::Inference(format!("input tensor: {e}")))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![tensor])
            .map_err(|e| PredictError::Inference(format!("classifier run: {e}")))?;

        let output = outputs.get(&self.proba_output).ok_or_else(|| {
            PredictError::Inference(format!("missing output '{}'", self.proba_output))
        })?;

        let (_, probas) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| PredictError::Inference(format!("probability extraction: {e}")))?;

        Ok(probas.to_vec())
    }
}

fn session_error(path: &Path, e: ort::Error) -> ArtifactError {
    ArtifactError::Session {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}
