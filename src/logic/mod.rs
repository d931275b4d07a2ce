//! Logic Module - Prediction Pipeline
//!
//! - `disease` - the five registered outbreak indicators
//! - `features/` - input schema and record assembly
//! - `model/` - artifact loading and inference dispatch

pub mod disease;
pub mod features;
pub mod model;
