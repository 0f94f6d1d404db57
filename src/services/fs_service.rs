use crate::error::AppError;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions accepted by the upload controls of both pages.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

pub fn ensure_supported(path: &Path) -> Result<(), AppError> {
    if is_supported_image(path) {
        Ok(())
    } else {
        Err(AppError::new(format!(
            "Unsupported file type: {}",
            path.display()
        )))
    }
}

pub fn file_size(path: &Path) -> Result<u64, AppError> {
    Ok(std::fs::metadata(path)
        .map_err(|e| AppError::new(format!("Failed to stat {}: {}", path.display(), e)))?
        .len())
}

/// Expand a directory into its supported images (top level only), sorted by
/// file name.
pub fn list_image_files(dir: &str) -> Result<Vec<PathBuf>, AppError> {
    let dir_path = Path::new(dir);
    if !dir_path.is_dir() {
        return Err(AppError::new(format!("Path is not a directory: {}", dir)));
    }

    let mut images: Vec<PathBuf> = WalkDir::new(dir_path)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_supported_image(path))
        .collect();

    images.sort_by_key(|p| p.file_name().unwrap_or_default().to_ascii_lowercase());
    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_check_is_case_insensitive_and_closed() {
        assert!(is_supported_image(Path::new("a.jpg")));
        assert!(is_supported_image(Path::new("b.JPEG")));
        assert!(is_supported_image(Path::new("c.Png")));
        assert!(is_supported_image(Path::new("d.webp")));
        assert!(!is_supported_image(Path::new("e.gif")));
        assert!(!is_supported_image(Path::new("f.tiff")));
        assert!(!is_supported_image(Path::new("noext")));
    }

    #[test]
    fn listing_filters_and_sorts_by_name() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.png", "A.jpg", "notes.txt", "c.webp"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub/deep.png"), b"x").unwrap();

        let files = list_image_files(dir.path().to_str().unwrap()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["A.jpg", "b.png", "c.webp"]);
    }

    #[test]
    fn listing_a_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("x.png");
        std::fs::write(&file, b"x").unwrap();
        assert!(list_image_files(file.to_str().unwrap()).is_err());
    }
}
