//! Features Module - Input Schema & Record Assembly
//!
//! Keeps the fitted input schema (`layout`) and the per-request record
//! assembly (`record`) separate from the inference machinery.

pub mod layout;
pub mod record;

#[cfg(test)]
mod tests;

// Re-export common types
pub use layout::{layout_hash, LayoutInfo, FEATURE_COLUMNS, FEATURE_COLUMN_COUNT};
pub use record::{FeatureRecord, LagTriplet};
