//! Inference Dispatcher - from assembled record to outcome
//!
//! Pure orchestration over the loaded artifacts: pick the classifier for the
//! disease, transform the record through the shared preprocessor, predict,
//! and extract the outbreak probability.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::store::ArtifactStore;
use crate::logic::disease::Disease;
use crate::logic::features::record::FeatureRecord;

/// Class label meaning "outbreak" in every trained classifier.
pub const OUTBREAK_CLASS: i64 = 1;

/// Request-time prediction failure.
#[derive(Debug, Clone, Error)]
pub enum PredictError {
    /// Label outside the five registered disease keys. Unreachable through
    /// the closed selector, handled defensively anyway.
    #[error("unknown disease '{0}'")]
    UnknownDisease(String),

    /// Organisation unit outside the fitted vocabulary.
    #[error("unknown organisation unit '{0}'")]
    UnknownOrganisationUnit(String),

    /// Anything the ONNX runtime reports mid-request.
    #[error("inference failed: {0}")]
    Inference(String),
}

/// What the UI renders after a prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionOutcome {
    /// Wire key of the predicted disease.
    pub disease: String,
    /// Display-formatted disease name for the result panel.
    pub display_name: String,
    pub outbreak: bool,
    /// Probability of outbreak (class 1), in [0, 1].
    pub probability: f64,
    pub inference_time_us: u64,
}

/// Run one prediction. Deterministic and side-effect free apart from the
/// status-panel counters.
pub fn predict(
    store: &ArtifactStore,
    disease: Disease,
    record: &FeatureRecord,
) -> Result<PredictionOutcome, PredictError> {
    let started = Instant::now();

    let features = store.preprocessor().transform(record)?;
    let classifier = store.classifier(disease);

    let label = classifier.predict(&features)?;

    // Probability of the positive class. If the classifier never observed a
    // positive example during training, the probability of outbreak is
    // defined as exactly 0.0 instead of an error. This branch is observable
    // behavior for all-negative training samples; do not fold it into a
    // generic missing-class fallback.
    let probability = match classifier
        .classes()
        .iter()
        .position(|&c| c == OUTBREAK_CLASS)
    {
        Some(index) => {
            let probas = classifier.predict_proba(&features)?;
            f64::from(*probas.get(index).ok_or_else(|| {
                PredictError::Inference(format!(
                    "probability vector has {} entries, class index is {}",
                    probas.len(),
                    index
                ))
            })?)
        }
        None => 0.0,
    };

    let latency_us = started.elapsed().as_micros() as u64;
    store.record_prediction(latency_us);

    log::debug!(
        "{}: label={} probability={:.4} ({}us)",
        disease.key(),
        label,
        probability,
        latency_us
    );

    Ok(PredictionOutcome {
        disease: disease.key().to_string(),
        display_name: disease.display_name(),
        outbreak: label == OUTBREAK_CLASS,
        probability,
        inference_time_us: latency_us,
    })
}

/// Resolve a wire key and predict. This is the string boundary the UI talks
/// to; everything behind it dispatches on the enum.
pub fn predict_for_key(
    store: &ArtifactStore,
    key: &str,
    record: &FeatureRecord,
) -> Result<PredictionOutcome, PredictError> {
    let disease =
        Disease::from_key(key).ok_or_else(|| PredictError::UnknownDisease(key.to_string()))?;
    predict(store, disease, record)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::record::LagTriplet;
    use crate::logic::model::classifier::OutbreakClassifier;
    use crate::logic::model::preprocess::Preprocessor;

    struct FixedPreprocessor;

    impl Preprocessor for FixedPreprocessor {
        fn transform(&self, record: &FeatureRecord) -> Result<Vec<f32>, PredictError> {
            // Deterministic stand-in for the fitted transform.
            let mut out = vec![record.week_of_year as f32, record.day_of_week as f32];
            out.extend(record.lag_slots().iter().map(|&v| v as f32));
            Ok(out)
        }
    }

    struct FixedClassifier {
        classes: Vec<i64>,
        label: i64,
        probas: Vec<f32>,
    }

    impl OutbreakClassifier for FixedClassifier {
        fn classes(&self) -> &[i64] {
            &self.classes
        }

        fn predict(&self, _features: &[f32]) -> Result<i64, PredictError> {
            Ok(self.label)
        }

        fn predict_proba(&self, _features: &[f32]) -> Result<Vec<f32>, PredictError> {
            Ok(self.probas.clone())
        }
    }

    fn store_with(build: impl Fn(Disease) -> FixedClassifier) -> ArtifactStore {
        let classifiers: Vec<Box<dyn OutbreakClassifier>> = Disease::ALL
            .into_iter()
            .map(|d| Box::new(build(d)) as Box<dyn OutbreakClassifier>)
            .collect();
        ArtifactStore::from_parts(
            Box::new(FixedPreprocessor),
            classifiers,
            vec!["Dakar Nord".to_string(), "Thies".to_string()],
        )
    }

    fn record() -> FeatureRecord {
        FeatureRecord::assemble(
            Disease::Cholera,
            "Dakar Nord",
            10,
            2,
            LagTriplet::new(5, 3, 1),
        )
    }

    #[test]
    fn test_positive_prediction_extracts_class_one_probability() {
        let store = store_with(|_| FixedClassifier {
            classes: vec![0, 1],
            label: 1,
            probas: vec![0.25, 0.75],
        });

        let outcome = predict(&store, Disease::Cholera, &record()).unwrap();
        assert!(outcome.outbreak);
        assert!((outcome.probability - 0.75).abs() < 1e-6);
        assert_eq!(outcome.disease, "Cholera_Outbreak");
        assert_eq!(outcome.display_name, "Cholera");
    }

    #[test]
    fn test_probability_honors_class_ordering() {
        // Observed class order [1, 0]: the positive column comes first.
        let store = store_with(|_| FixedClassifier {
            classes: vec![1, 0],
            label: 0,
            probas: vec![0.10, 0.90],
        });

        let outcome = predict(&store, Disease::Measles, &record()).unwrap();
        assert!(!outcome.outbreak);
        assert!((outcome.probability - 0.10).abs() < 1e-6);
    }

    #[test]
    fn test_all_negative_classifier_yields_exact_zero() {
        // Trained on an all-negative sample: classes = {0}. The probability
        // of outbreak must be exactly 0.0, not an error.
        let store = store_with(|_| FixedClassifier {
            classes: vec![0],
            label: 0,
            probas: vec![1.0],
        });

        let outcome = predict(&store, Disease::Dengue, &record()).unwrap();
        assert!(!outcome.outbreak);
        assert_eq!(outcome.probability, 0.0);
    }

    #[test]
    fn test_predict_is_deterministic() {
        let store = store_with(|_| FixedClassifier {
            classes: vec![0, 1],
            label: 1,
            probas: vec![0.4, 0.6],
        });

        let first = predict(&store, Disease::Covid19, &record()).unwrap();
        let second = predict(&store, Disease::Covid19, &record()).unwrap();
        assert_eq!(first.outbreak, second.outbreak);
        assert_eq!(first.probability, second.probability);
        assert_eq!(first.disease, second.disease);
    }

    #[test]
    fn test_unknown_key_fails_before_any_inference() {
        let store = store_with(|_| FixedClassifier {
            classes: vec![0, 1],
            label: 1,
            probas: vec![0.0, 1.0],
        });

        for bad in ["", "Ebola_Outbreak", "cholera_outbreak"] {
            let err = predict_for_key(&store, bad, &record()).unwrap_err();
            assert!(matches!(err, PredictError::UnknownDisease(ref k) if k == bad));
        }

        // Nothing ran, so the counters are untouched.
        assert_eq!(store.status().prediction_count, 0);
    }

    #[test]
    fn test_predict_for_key_resolves_all_registered_keys() {
        let store = store_with(|d| FixedClassifier {
            classes: vec![0, 1],
            label: i64::from(d == Disease::Cholera),
            probas: vec![0.5, 0.5],
        });

        for disease in Disease::ALL {
            let outcome = predict_for_key(&store, disease.key(), &record()).unwrap();
            assert_eq!(outcome.disease, disease.key());
            assert_eq!(outcome.outbreak, disease == Disease::Cholera);
        }
    }

    #[test]
    fn test_short_probability_vector_is_reported() {
        let store = store_with(|_| FixedClassifier {
            classes: vec![0, 1],
            label: 1,
            probas: vec![0.3], // missing the positive column
        });

        let err = predict(&store, Disease::Meningitis, &record()).unwrap_err();
        assert!(matches!(err, PredictError::Inference(_)));
    }
}
