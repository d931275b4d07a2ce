//! Central Configuration Constants
//!
//! Single source of truth for configuration defaults. The artifact directory
//! is the only tunable: env override first, platform data dir second,
//! `./artifacts` last.

use std::path::PathBuf;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "EpiWatch";

/// Env var overriding the artifact directory.
pub const ARTIFACT_DIR_ENV: &str = "EPIWATCH_ARTIFACT_DIR";

/// Fallback artifact directory relative to the working directory.
pub const DEFAULT_ARTIFACT_DIR: &str = "artifacts";

/// Resolve the artifact directory for this run.
///
/// Order: `EPIWATCH_ARTIFACT_DIR`, then `<data_dir>/EpiWatch/models` if it
/// exists, then `./artifacts`. Existence of the winner is checked later by
/// the artifact loader, which owns the fatal error.
pub fn artifact_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(ARTIFACT_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(data_dir) = dirs::data_dir() {
        let candidate = data_dir.join(APP_NAME).join("models");
        if candidate.is_dir() {
            return candidate;
        }
    }

    PathBuf::from(DEFAULT_ARTIFACT_DIR)
}
