//! API Module - Tauri commands exposed to the dashboard front-end.

pub mod commands;

pub use commands::*;
