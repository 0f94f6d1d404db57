use crate::error::AppError;
use crate::models::exif_types::ExifData;
use exif::{In, Tag};
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;

pub fn read_exif(path: &Path) -> Result<ExifData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(format!("Failed to open file: {}", e)))?;

    let mut reader = BufReader::new(file);
    let exif = exif::Reader::new()
        .read_from_container(&mut reader)
        .map_err(|e| AppError::new(format!("Failed to read EXIF data: {}", e)))?;

    let text = |tag: Tag| {
        exif.get_field(tag, In::PRIMARY)
            .map(|f| f.display_value().to_string().trim_matches('"').to_string())
    };
    let dimension = |tag: Tag| {
        exif.get_field(tag, In::PRIMARY).and_then(|f| match f.value {
            exif::Value::Long(ref v) => v.first().copied(),
            exif::Value::Short(ref v) => v.first().map(|&x| x as u32),
            _ => None,
        })
    };

    Ok(ExifData {
        camera_make: text(Tag::Make),
        camera_model: text(Tag::Model),
        date_taken: text(Tag::DateTimeOriginal),
        exposure_time: text(Tag::ExposureTime),
        f_number: text(Tag::FNumber),
        iso: text(Tag::PhotographicSensitivity),
        focal_length: text(Tag::FocalLength),
        width: dimension(Tag::PixelXDimension),
        height: dimension(Tag::PixelYDimension),
        orientation: text(Tag::Orientation),
    })
}

/// Efficiently read the file header to find the EXIF orientation tag,
/// defaulting to 1.
pub fn get_orientation(path: &Path) -> u32 {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(_) => return 1,
    };

    // Read first 128KB (covers most EXIF headers)
    let mut header_buf = Vec::with_capacity(128 * 1024);
    if file.take(128 * 1024).read_to_end(&mut header_buf).is_err() {
        return 1;
    }

    let exif = match exif::Reader::new().read_from_container(&mut Cursor::new(&header_buf)) {
        Ok(e) => e,
        Err(_) => return 1,
    };

    if let Some(field) = exif.get_field(Tag::Orientation, In::PRIMARY) {
        match field.value {
            exif::Value::Short(ref v) => *v.first().unwrap_or(&1) as u32,
            exif::Value::Long(ref v) => *v.first().unwrap_or(&1),
            _ => 1,
        }
    } else {
        1
    }
}

/// Apply EXIF orientation to the image.
pub fn apply_orientation(img: image::DynamicImage, orientation: u32) -> image::DynamicImage {
    match orientation {
        2 => img.fliph(),
        3 => img.rotate180(),
        4 => img.flipv(),
        5 => img.fliph().rotate90(),
        6 => img.rotate90(),
        7 => img.fliph().rotate270(),
        8 => img.rotate270(),
        _ => img,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orientation_defaults_to_one_without_exif() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.png");
        image::RgbImage::from_pixel(8, 8, image::Rgb([1, 2, 3]))
            .save(&path)
            .unwrap();
        assert_eq!(get_orientation(&path), 1);
    }

    #[test]
    fn orientation_six_rotates_quarter_turn() {
        let img = image::DynamicImage::new_rgb8(30, 20);
        let rotated = apply_orientation(img, 6);
        assert_eq!((rotated.width(), rotated.height()), (20, 30));
    }
}
