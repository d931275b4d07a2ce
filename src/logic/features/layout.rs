//! Feature Layout - Centralized Feature Schema
//!
//! **CRITICAL: This file controls the input schema the preprocessor was
//! fitted on.** Column names and order must match the training pipeline
//! verbatim; a silent mismatch here corrupts every prediction.
//!
//! ## Rules (NEVER break these):
//! 1. Add column → increment LAYOUT_VERSION
//! 2. Change order → increment LAYOUT_VERSION
//! 3. Remove column → increment LAYOUT_VERSION
//!
//! The artifact manifest records the layout hash the artifacts were fitted
//! against; `ArtifactStore::load` refuses to start on a mismatch.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

use crate::logic::disease::Disease;

/// Current feature layout version.
/// MUST be incremented when the layout changes.
pub const LAYOUT_VERSION: u8 = 1;

/// Column names in the exact order the preprocessor consumes them.
/// This is the SINGLE SOURCE OF TRUTH for the input schema.
pub const FEATURE_COLUMNS: &[&str] = &[
    // === Context (0-2) ===
    "organisationunitname", // 0: administrative unit (categorical)
    "week_of_year",         // 1: 1-52
    "day_of_week",          // 2: 0=Monday .. 6=Sunday
    // === Lag triplets, one per disease in Disease::ALL order (3-17) ===
    "Meningite_lag1",
    "Meningite_lag2",
    "Meningite_lag3",
    "Rougeole_lag1",
    "Rougeole_lag2",
    "Rougeole_lag3",
    "Dengue_Cas_confirme_(hebdomadaire)_lag1",
    "Dengue_Cas_confirme_(hebdomadaire)_lag2",
    "Dengue_Cas_confirme_(hebdomadaire)_lag3",
    "Cholera_lag1",
    "Cholera_lag2",
    "Cholera_lag3",
    "Covid19_lag1",
    "Covid19_lag2",
    "Covid19_lag3",
];

/// Total number of columns.
/// IMPORTANT: Must match FEATURE_COLUMNS.len()!
pub const FEATURE_COLUMN_COUNT: usize = 18;

/// Index of the first lag column.
pub const LAG_BASE_INDEX: usize = 3;

/// Lags kept per disease (lag1..lag3).
pub const LAGS_PER_DISEASE: usize = 3;

/// Number of lag columns (5 diseases x 3 lags).
pub const LAG_COLUMN_COUNT: usize = 15;

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// CRC32 over version + column names, used to detect a drift between this
/// schema and the one the artifacts were fitted on.
pub fn layout_hash() -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&[LAYOUT_VERSION]);
    for name in FEATURE_COLUMNS {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // separator
    }
    hasher.finalize()
}

/// Complete layout information for the status panel and logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub column_count: usize,
    pub column_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: LAYOUT_VERSION,
            hash: layout_hash(),
            column_count: FEATURE_COLUMN_COUNT,
            column_names: FEATURE_COLUMNS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

// ============================================================================
// COLUMN LOOKUP
// ============================================================================

/// Get column index by name (O(n) but columns are few).
pub fn column_index(name: &str) -> Option<usize> {
    FEATURE_COLUMNS.iter().position(|&n| n == name)
}

/// Get column name by index.
pub fn column_name(index: usize) -> Option<&'static str> {
    FEATURE_COLUMNS.get(index).copied()
}

/// Index of a disease's lag column within the 15-slot lag block.
/// `lag` is 1-based (lag1..lag3).
pub fn lag_slot(disease: Disease, lag: usize) -> usize {
    debug_assert!((1..=LAGS_PER_DISEASE).contains(&lag));
    disease.index() * LAGS_PER_DISEASE + (lag - 1)
}

/// Absolute column index of a disease's lag column in the full layout.
pub fn lag_column_index(disease: Disease, lag: usize) -> usize {
    LAG_BASE_INDEX + lag_slot(disease, lag)
}

// ============================================================================
// TESTS
// ============================================================================
