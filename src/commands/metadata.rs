use crate::error::AppError;
use crate::models::exif_types::ExifData;
use crate::models::toolkit_types::ImageInfo;
use crate::services::{exif_service, fs_service, preview_service, stats_service};
use std::path::{Path, PathBuf};

#[tauri::command]
pub async fn image_info(path: String) -> Result<ImageInfo, AppError> {
    let img_path = PathBuf::from(path);
    fs_service::ensure_supported(&img_path)?;

    tokio::task::spawn_blocking(move || stats_service::inspect(&img_path))
        .await
        .map_err(|e| AppError::new(format!("Task join failed: {}", e)))?
}

#[tauri::command]
pub fn read_exif(path: String) -> Result<ExifData, AppError> {
    exif_service::read_exif(Path::new(&path))
}

#[tauri::command]
pub async fn get_preview(path: String) -> Result<String, AppError> {
    let img_path = PathBuf::from(path);
    fs_service::ensure_supported(&img_path)?;

    tokio::task::spawn_blocking(move || preview_service::generate_preview(&img_path))
        .await
        .map_err(|e| AppError::new(format!("Task join failed: {}", e)))?
}
