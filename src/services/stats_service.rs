use crate::error::AppError;
use crate::models::toolkit_types::{BatchStats, HistorySummary, ImageInfo, UploadRecord};
use image::ImageReader;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

pub fn aspect_ratio_label(width: u32, height: u32) -> String {
    if height == 0 {
        return "0.00".to_string();
    }
    format!("{:.2}", width as f64 / height as f64)
}

fn color_mode_name(color: image::ColorType) -> &'static str {
    use image::ColorType;
    match color {
        ColorType::L8 => "L8",
        ColorType::La8 => "LA8",
        ColorType::Rgb8 => "RGB8",
        ColorType::Rgba8 => "RGBA8",
        ColorType::L16 => "L16",
        ColorType::La16 => "LA16",
        ColorType::Rgb16 => "RGB16",
        ColorType::Rgba16 => "RGBA16",
        ColorType::Rgb32F => "RGB32F",
        ColorType::Rgba32F => "RGBA32F",
        _ => "other",
    }
}

/// Decode one image and derive its display row: dimensions, aspect ratio,
/// byte size, color mode, container format.
pub fn inspect(path: &Path) -> Result<ImageInfo, AppError> {
    let size_bytes = std::fs::metadata(path)
        .map_err(|e| AppError::new(format!("Failed to stat {}: {}", path.display(), e)))?
        .len();

    let reader = ImageReader::open(path)
        .map_err(|e| AppError::new(format!("Failed to open image {}: {}", path.display(), e)))?
        .with_guessed_format()
        .map_err(|e| AppError::new(format!("Failed to probe format of {}: {}", path.display(), e)))?;

    let format = reader.format().map(|f| f.to_mime_type().to_string());

    let img = reader
        .decode()
        .map_err(|e| AppError::new(format!("Failed to decode image {}: {}", path.display(), e)))?;

    let (width, height) = (img.width(), img.height());

    Ok(ImageInfo {
        file_name: path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string(),
        width,
        height,
        aspect_ratio: aspect_ratio_label(width, height),
        size_bytes,
        color_mode: color_mode_name(img.color()).to_string(),
        format,
    })
}

/// Per-image rows plus aggregates for a batch upload. Always recomputed from
/// scratch; unreadable files are skipped rather than failing the batch.
pub fn batch_stats(paths: &[PathBuf]) -> BatchStats {
    let images: Vec<ImageInfo> = paths
        .par_iter()
        .filter_map(|path| match inspect(path) {
            Ok(info) => Some(info),
            Err(e) => {
                eprintln!("Skipping {}: {}", path.display(), e);
                None
            }
        })
        .collect();

    summarize_batch(images)
}

fn summarize_batch(images: Vec<ImageInfo>) -> BatchStats {
    let count = images.len();
    let total_bytes: u64 = images.iter().map(|i| i.size_bytes).sum();
    let width_sum: u64 = images.iter().map(|i| i.width as u64).sum();
    let height_sum: u64 = images.iter().map(|i| i.height as u64).sum();

    BatchStats {
        count,
        total_bytes,
        average_bytes: if count == 0 { 0 } else { total_bytes / count as u64 },
        average_width: if count == 0 { 0.0 } else { width_sum as f32 / count as f32 },
        average_height: if count == 0 { 0.0 } else { height_sum as f32 / count as f32 },
        images,
    }
}

pub fn summarize_history(records: &[UploadRecord]) -> HistorySummary {
    let count = records.len();
    let total_bytes: u64 = records.iter().map(|r| r.size_bytes).sum();

    HistorySummary {
        count,
        total_bytes,
        average_bytes: if count == 0 { 0 } else { total_bytes / count as u64 },
        last_upload: records.iter().map(|r| r.timestamp).max(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, size: u64, ts: i64) -> UploadRecord {
        UploadRecord {
            file_name: name.to_string(),
            timestamp: ts,
            size_bytes: size,
        }
    }

    #[test]
    fn aspect_ratio_is_two_decimal_string() {
        assert_eq!(aspect_ratio_label(200, 100), "2.00");
        assert_eq!(aspect_ratio_label(100, 100), "1.00");
        assert_eq!(aspect_ratio_label(1920, 1080), "1.78");
        assert_eq!(aspect_ratio_label(10, 0), "0.00");
    }

    #[test]
    fn empty_batch_produces_no_rows() {
        let stats = batch_stats(&[]);
        assert_eq!(stats.count, 0);
        assert!(stats.images.is_empty());
        assert_eq!(stats.total_bytes, 0);
        assert_eq!(stats.average_bytes, 0);
    }

    #[test]
    fn batch_skips_unreadable_files() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.png");
        image::RgbImage::from_pixel(200, 100, image::Rgb([10, 20, 30]))
            .save(&good)
            .unwrap();
        let bad = dir.path().join("bad.png");
        std::fs::write(&bad, b"definitely not a png").unwrap();

        let stats = batch_stats(&[good, bad]);
        assert_eq!(stats.count, 1);
        assert_eq!(stats.images[0].width, 200);
        assert_eq!(stats.images[0].height, 100);
        assert_eq!(stats.images[0].aspect_ratio, "2.00");
        assert_eq!(stats.images[0].color_mode, "RGB8");
    }

    #[test]
    fn history_summary_sums_and_averages() {
        let records = vec![record("a.jpg", 100, 5), record("b.png", 300, 9)];
        let summary = summarize_history(&records);
        assert_eq!(summary.count, 2);
        assert_eq!(summary.total_bytes, 400);
        assert_eq!(summary.average_bytes, 200);
        assert_eq!(summary.last_upload, Some(9));
    }

    #[test]
    fn empty_history_summary_is_zeroed() {
        let summary = summarize_history(&[]);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.total_bytes, 0);
        assert_eq!(summary.average_bytes, 0);
        assert_eq!(summary.last_upload, None);
    }
}
