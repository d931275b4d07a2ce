//! Feature Record - the single-row model input
//!
//! One prediction request = one `FeatureRecord`. The record carries every
//! column of the fitted schema; the lag triplets of the four non-selected
//! diseases are always zero because the form only exposes lag inputs for the
//! selected disease.
//!
//! The record applies NO transformation. Encoding the organisation unit and
//! scaling the numerics is the preprocessor artifact's job.

use serde::{Deserialize, Serialize};

use super::layout::{lag_slot, LAG_COLUMN_COUNT};
use crate::logic::disease::Disease;

/// Confirmed-case counts for the selected disease, 1-3 weeks before the
/// target week.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LagTriplet {
    pub lag1: u32,
    pub lag2: u32,
    pub lag3: u32,
}

impl LagTriplet {
    pub fn new(lag1: u32, lag2: u32, lag3: u32) -> Self {
        Self { lag1, lag2, lag3 }
    }
}

/// One row in the fitted input schema.
///
/// Field order mirrors `layout::FEATURE_COLUMNS`: context columns first,
/// then the 15 lag slots in `Disease::ALL` order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub organisationunitname: String,
    pub week_of_year: u32,
    pub day_of_week: u32,
    lags: [u32; LAG_COLUMN_COUNT],
}

impl FeatureRecord {
    /// Assemble a record for one prediction request.
    ///
    /// All 15 lag slots start at zero; only the selected disease's triplet
    /// is overwritten with the supplied counts. Context fields are copied
    /// verbatim. Range validation happens at the command boundary, not here.
    pub fn assemble(
        disease: Disease,
        organisation_unit: &str,
        week_of_year: u32,
        day_of_week: u32,
        lags: LagTriplet,
    ) -> Self {
        let mut slots = [0u32; LAG_COLUMN_COUNT];
        slots[lag_slot(disease, 1)] = lags.lag1;
        slots[lag_slot(disease, 2)] = lags.lag2;
        slots[lag_slot(disease, 3)] = lags.lag3;

        Self {
            organisationunitname: organisation_unit.to_string(),
            week_of_year,
            day_of_week,
            lags: slots,
        }
    }

    /// Lag count for a disease. `lag` is 1-based (lag1..lag3).
    pub fn lag(&self, disease: Disease, lag: usize) -> u32 {
        self.lags[lag_slot(disease, lag)]
    }

    /// All 15 lag slots in layout order.
    pub fn lag_slots(&self) -> &[u32; LAG_COLUMN_COUNT] {
        &self.lags
    }

    /// The numeric columns (everything after `organisationunitname`) as f32,
    /// in layout order: week, day, then the 15 lag slots. The categorical
    /// column is prepended by the preprocessor adapter once encoded.
    pub fn numeric_row(&self) -> [f32; 2 + LAG_COLUMN_COUNT] {
        let mut row = [0.0f32; 2 + LAG_COLUMN_COUNT];
        row[0] = self.week_of_year as f32;
        row[1] = self.day_of_week as f32;
        for (slot, value) in self.lags.iter().enumerate() {
            row[2 + slot] = *value as f32;
        }
        row
    }
}
