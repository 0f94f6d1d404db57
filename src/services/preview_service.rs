use crate::error::AppError;
use crate::services::exif_service;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::ImageReader;
use std::io::Cursor;
use std::path::Path;

const PREVIEW_EDGE: u32 = 640;
const PREVIEW_QUALITY: u8 = 80;

/// Downscaled JPEG preview of an upload as a base64 data URI, with EXIF
/// orientation applied so portrait shots display upright.
pub fn generate_preview(path: &Path) -> Result<String, AppError> {
    let mut img = ImageReader::open(path)
        .map_err(|e| AppError::new(format!("Failed to open image {}: {}", path.display(), e)))?
        .decode()
        .map_err(|e| AppError::new(format!("Failed to decode image {}: {}", path.display(), e)))?;

    if img.width() > PREVIEW_EDGE || img.height() > PREVIEW_EDGE {
        img = img.resize(PREVIEW_EDGE, PREVIEW_EDGE, FilterType::Triangle);
    }

    let orientation = exif_service::get_orientation(path);
    if orientation != 1 {
        img = exif_service::apply_orientation(img, orientation);
    }

    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, PREVIEW_QUALITY);
    img.write_with_encoder(encoder)
        .map_err(|e| AppError::new(format!("Failed to encode preview: {}", e)))?;

    let b64 = base64::engine::general_purpose::STANDARD.encode(buffer.into_inner());
    Ok(format!("data:image/jpeg;base64,{}", b64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_is_jpeg_data_uri_and_bounded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("large.png");
        image::RgbImage::from_pixel(1600, 900, image::Rgb([60, 120, 180]))
            .save(&path)
            .unwrap();

        let uri = generate_preview(&path).unwrap();
        assert!(uri.starts_with("data:image/jpeg;base64,"));

        let b64 = uri.trim_start_matches("data:image/jpeg;base64,");
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(b64)
            .unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert!(decoded.width() <= PREVIEW_EDGE);
        assert!(decoded.height() <= PREVIEW_EDGE);
    }
}
