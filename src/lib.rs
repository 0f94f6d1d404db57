mod commands;
mod error;
mod models;
mod services;

use services::classifier::model_manager::ModelManager;
use services::history::UploadHistory;
use tauri::{Emitter, Manager};

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_window_state::Builder::default().build())
        .setup(|app| {
            let app_data_dir = app
                .path()
                .app_data_dir()
                .expect("Failed to get app data directory");

            if !app_data_dir.exists() {
                std::fs::create_dir_all(&app_data_dir).expect("Failed to create app data directory");
            }

            let model_manager = ModelManager::new(app_data_dir);
            app.manage(model_manager.clone());

            app.manage(UploadHistory::default());

            // Load the pretrained weights on startup when they are already on
            // disk; otherwise the classifier page offers the download.
            let app_handle = app.handle().clone();
            tauri::async_runtime::spawn(async move {
                if !model_manager.is_downloaded() {
                    let _ = app_handle.emit("model-state", serde_json::json!({
                        "status": "missing"
                    }));
                    return;
                }

                let _ = app_handle.emit("model-state", serde_json::json!({
                    "status": "loading"
                }));
                if let Err(e) = model_manager.load_model().await {
                    eprintln!("Startup model load failed: {}", e);
                    let _ = app_handle.emit("model-state", serde_json::json!({
                        "status": "error",
                        "message": e.message
                    }));
                    return;
                }

                let _ = app_handle.emit("model-state", serde_json::json!({
                    "status": "ready"
                }));
            });

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::classifier::get_model_status,
            commands::classifier::download_model,
            commands::classifier::load_model,
            commands::classifier::classify_image,
            commands::enhance::enhance_image,
            commands::enhance::save_enhanced,
            commands::stats::record_upload,
            commands::stats::upload_history,
            commands::stats::history_summary,
            commands::stats::size_chart,
            commands::stats::batch_stats,
            commands::stats::dominant_colors,
            commands::stats::get_histogram,
            commands::metadata::image_info,
            commands::metadata::read_exif,
            commands::metadata::get_preview,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
