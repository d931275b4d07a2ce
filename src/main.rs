//! EpiWatch Core - Main Entry Point
//!
//! Loads the prediction artifacts once, then hands the immutable store to
//! the Tauri runtime as managed state. Artifact failure is fatal: a
//! dashboard without its models has nothing to show.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod api;
mod logic;
pub mod constants;

use api::commands;
use logic::model::ArtifactStore;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting {} v{}...", constants::APP_NAME, constants::APP_VERSION);

    let artifact_dir = constants::artifact_dir();
    let store = match ArtifactStore::load(&artifact_dir) {
        Ok(store) => store,
        Err(e) => {
            log::error!(
                "failed to load prediction artifacts from {}: {}",
                artifact_dir.display(),
                e
            );
            std::process::exit(1);
        }
    };

    tauri::Builder::default()
        .plugin(tauri_plugin_shell::init())
        .manage(store)
        .invoke_handler(tauri::generate_handler![
            // Selector Commands
            commands::list_diseases,
            commands::list_organisation_units,
            // Prediction Commands
            commands::predict_outbreak,
            // Status Commands
            commands::get_engine_status,
            commands::verify_artifact_checksums,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
