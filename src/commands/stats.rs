use crate::error::AppError;
use crate::models::toolkit_types::{
    BatchReport, ColorReport, HistogramReport, HistorySummary, UploadRecord,
};
use crate::services::history::UploadHistory;
use crate::services::{chart_service, color_service, fs_service, stats_service};
use std::path::PathBuf;
use tauri::State;

#[tauri::command]
pub fn record_upload(
    history: State<'_, UploadHistory>,
    path: String,
) -> Result<UploadRecord, AppError> {
    let img_path = PathBuf::from(&path);
    fs_service::ensure_supported(&img_path)?;

    let size = fs_service::file_size(&img_path)?;
    let file_name = img_path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    Ok(history.record(&file_name, size))
}

#[tauri::command]
pub fn upload_history(history: State<'_, UploadHistory>) -> Vec<UploadRecord> {
    history.snapshot()
}

#[tauri::command]
pub fn history_summary(history: State<'_, UploadHistory>) -> HistorySummary {
    stats_service::summarize_history(&history.snapshot())
}

/// Byte-size bars over the whole upload history, absent while it is empty.
#[tauri::command]
pub fn size_chart(history: State<'_, UploadHistory>) -> Result<Option<String>, AppError> {
    let sizes: Vec<u64> = history.snapshot().iter().map(|r| r.size_bytes).collect();
    chart_service::history_size_chart(&sizes)
}

/// Batch analysis over a mix of files and folders. Folders are expanded one
/// level deep; everything else must pass the extension allow-list.
#[tauri::command]
pub async fn batch_stats(paths: Vec<String>) -> Result<BatchReport, AppError> {
    let mut files: Vec<PathBuf> = Vec::new();
    for p in paths {
        let path = PathBuf::from(&p);
        if path.is_dir() {
            files.extend(fs_service::list_image_files(&p)?);
        } else {
            fs_service::ensure_supported(&path)?;
            files.push(path);
        }
    }

    tokio::task::spawn_blocking(move || {
        let stats = stats_service::batch_stats(&files);
        let size_chart = if stats.count == 0 {
            None
        } else {
            let sizes: Vec<u64> = stats.images.iter().map(|i| i.size_bytes).collect();
            Some(chart_service::render_size_bars(&sizes)?)
        };
        Ok(BatchReport { stats, size_chart })
    })
    .await
    .map_err(|e| AppError::new(format!("Task join failed: {}", e)))?
}

#[tauri::command]
pub async fn dominant_colors(path: String, k: Option<usize>) -> Result<ColorReport, AppError> {
    let img_path = PathBuf::from(path);
    fs_service::ensure_supported(&img_path)?;
    let k = k.unwrap_or(5).max(1);

    tokio::task::spawn_blocking(move || {
        let colors = color_service::dominant_colors(&img_path, k)?;
        let chart = chart_service::render_color_bar(&colors)?;
        Ok(ColorReport { colors, chart })
    })
    .await
    .map_err(|e| AppError::new(format!("Task join failed: {}", e)))?
}

#[tauri::command]
pub async fn get_histogram(path: String) -> Result<HistogramReport, AppError> {
    let img_path = PathBuf::from(path);
    fs_service::ensure_supported(&img_path)?;

    tokio::task::spawn_blocking(move || {
        let histogram = chart_service::histogram_data(&img_path)?;
        let chart = chart_service::render_histogram(&histogram)?;
        Ok(HistogramReport { histogram, chart })
    })
    .await
    .map_err(|e| AppError::new(format!("Task join failed: {}", e)))?
}
