use crate::error::AppError;
use crate::models::classify_types::{ClassifyResult, ModelStatus};
use crate::services::classifier::inference;
use crate::services::classifier::model_manager::ModelManager;
use crate::services::fs_service;
use std::path::PathBuf;
use tauri::{AppHandle, State};

/// Shown for any decode or inference failure. The cause goes to stderr only;
/// the user never sees the distinction.
const ANALYSIS_FAILED: &str = "Analysis failed. Please try another image.";

#[tauri::command]
pub async fn get_model_status(
    model_manager: State<'_, ModelManager>,
) -> Result<ModelStatus, AppError> {
    Ok(ModelStatus {
        downloaded: model_manager.is_downloaded(),
        loading: model_manager.is_loading().await,
        ready: model_manager.is_ready(),
        error: model_manager.get_error().await,
    })
}

#[tauri::command]
pub async fn download_model(
    app: AppHandle,
    model_manager: State<'_, ModelManager>,
    url: String,
) -> Result<(), AppError> {
    model_manager.download_model(&app, &url).await
}

#[tauri::command]
pub async fn load_model(model_manager: State<'_, ModelManager>) -> Result<(), AppError> {
    if !model_manager.is_downloaded() {
        return Err("Model weights not found. Download them first.".into());
    }
    model_manager.load_model().await
}

#[tauri::command]
pub async fn classify_image(
    model_manager: State<'_, ModelManager>,
    path: String,
) -> Result<ClassifyResult, AppError> {
    let img_path = PathBuf::from(&path);
    fs_service::ensure_supported(&img_path)?;

    if !model_manager.is_ready() {
        return Err("Model not loaded. Call load_model first.".into());
    }

    let session_lock = model_manager.session();
    let result = tokio::task::spawn_blocking(move || {
        let file_name = img_path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        let mut guard = session_lock.lock().unwrap();
        let session = guard
            .as_mut()
            .ok_or_else(|| AppError::new("Model unloaded during classification"))?;

        let classification = inference::classify_with_session(session, &img_path)?;

        Ok::<_, AppError>(ClassifyResult {
            file_name,
            classification,
        })
    })
    .await
    .map_err(|e| AppError::new(format!("Task join failed: {}", e)))?;

    result.map_err(|e| {
        eprintln!("Failed to classify {}: {}", path, e);
        AppError::new(ANALYSIS_FAILED)
    })
}
