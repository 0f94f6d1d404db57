use crate::error::AppError;
use crate::models::toolkit_types::{EnhanceParams, EnhancedImage};
use crate::services::{enhance_service, fs_service};
use std::path::PathBuf;

#[tauri::command]
pub async fn enhance_image(
    path: String,
    params: EnhanceParams,
) -> Result<EnhancedImage, AppError> {
    let img_path = PathBuf::from(path);
    fs_service::ensure_supported(&img_path)?;

    tokio::task::spawn_blocking(move || {
        let (out, png) = enhance_service::enhance_file(&img_path, &params)?;
        Ok(EnhancedImage {
            data_url: enhance_service::to_data_url(&png),
            width: out.width(),
            height: out.height(),
            size_bytes: png.len() as u64,
        })
    })
    .await
    .map_err(|e| AppError::new(format!("Task join failed: {}", e)))?
}

/// Re-run the pipeline and write the PNG where the user chose to download it.
#[tauri::command]
pub async fn save_enhanced(
    path: String,
    params: EnhanceParams,
    destination: String,
) -> Result<(), AppError> {
    let img_path = PathBuf::from(path);
    fs_service::ensure_supported(&img_path)?;

    tokio::task::spawn_blocking(move || {
        let (_, png) = enhance_service::enhance_file(&img_path, &params)?;
        std::fs::write(&destination, &png)
            .map_err(|e| AppError::new(format!("Failed to write {}: {}", destination, e)))?;
        Ok(())
    })
    .await
    .map_err(|e| AppError::new(format!("Task join failed: {}", e)))?
}
