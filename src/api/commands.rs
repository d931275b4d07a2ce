//! Tauri Commands - the input-collection boundary
//!
//! The form lives in the webview; these commands are where its values enter
//! the pipeline. Range clamping happens here and only here: the assembler
//! and dispatcher trust their inputs, matching the sliders' declared bounds.

use serde::{Deserialize, Serialize};
use tauri::State;

use crate::logic::disease::Disease;
use crate::logic::features::record::{FeatureRecord, LagTriplet};
use crate::logic::model::{inference, ArtifactStore, EngineStatus, PredictionOutcome};

/// Selector entry for the disease dropdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiseaseInfo {
    pub key: String,
    pub display_name: String,
}

/// Week slider bounds (ISO week of year).
pub const WEEK_MIN: i64 = 1;
pub const WEEK_MAX: i64 = 52;

/// Day slider bounds (0=Monday .. 6=Sunday).
pub const DAY_MIN: i64 = 0;
pub const DAY_MAX: i64 = 6;

/// Clamp raw form values to the declared input ranges.
fn clamp_inputs(week: i64, day: i64, lags: [i64; 3]) -> (u32, u32, LagTriplet) {
    let week = week.clamp(WEEK_MIN, WEEK_MAX) as u32;
    let day = day.clamp(DAY_MIN, DAY_MAX) as u32;
    let lag = |v: i64| v.max(0) as u32;
    (week, day, LagTriplet::new(lag(lags[0]), lag(lags[1]), lag(lags[2])))
}

// ============================================================================
// SELECTOR COMMANDS
// ============================================================================

/// The five diseases for the selector, in registry order.
#[tauri::command]
pub async fn list_diseases() -> Result<Vec<DiseaseInfo>, String> {
    Ok(Disease::ALL
        .into_iter()
        .map(|d| DiseaseInfo {
            key: d.key().to_string(),
            display_name: d.display_name(),
        })
        .collect())
}

/// Organisation units from the fitted vocabulary.
#[tauri::command]
pub async fn list_organisation_units(
    state: State<'_, ArtifactStore>,
) -> Result<Vec<String>, String> {
    Ok(state.organisation_units().to_vec())
}

// ============================================================================
// PREDICTION COMMANDS
// ============================================================================

/// Run one outbreak prediction from raw form values.
#[tauri::command]
pub async fn predict_outbreak(
    state: State<'_, ArtifactStore>,
    disease: String,
    organisation_unit: String,
    week_of_year: i64,
    day_of_week: i64,
    lag1: i64,
    lag2: i64,
    lag3: i64,
) -> Result<PredictionOutcome, String> {
    let (week, day, lags) = clamp_inputs(week_of_year, day_of_week, [lag1, lag2, lag3]);

    // The record needs the parsed disease for lag placement; the dispatcher
    // re-resolves the key and owns the unknown-disease error.
    let selected = Disease::from_key(&disease)
        .ok_or_else(|| inference::PredictError::UnknownDisease(disease.clone()).to_string())?;

    let record = FeatureRecord::assemble(selected, &organisation_unit, week, day, lags);

    inference::predict_for_key(&state, &disease, &record).map_err(|e| e.to_string())
}

// ============================================================================
// STATUS COMMANDS
// ============================================================================

/// Engine status for the dashboard footer.
#[tauri::command]
pub async fn get_engine_status(state: State<'_, ArtifactStore>) -> Result<EngineStatus, String> {
    Ok(state.status())
}

/// Re-verify every artifact against the manifest checksums.
#[tauri::command]
pub async fn verify_artifact_checksums(state: State<'_, ArtifactStore>) -> Result<bool, String> {
    match state.verify_checksums() {
        Ok(()) => Ok(true),
        Err(e) => {
            log::warn!("artifact checksum verification failed: {e}");
            Err(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_inputs_respects_slider_bounds() {
        let (week, day, lags) = clamp_inputs(0, -3, [-5, 2, 9]);
        assert_eq!(week, 1);
        assert_eq!(day, 0);
        assert_eq!((lags.lag1, lags.lag2, lags.lag3), (0, 2, 9));

        let (week, day, _) = clamp_inputs(99, 12, [0, 0, 0]);
        assert_eq!(week, 52);
        assert_eq!(day, 6);
    }

    #[test]
    fn test_clamp_inputs_passes_valid_values_through() {
        let (week, day, lags) = clamp_inputs(10, 2, [5, 3, 1]);
        assert_eq!(week, 10);
        assert_eq!(day, 2);
        assert_eq!((lags.lag1, lags.lag2, lags.lag3), (5, 3, 1));
    }
}
