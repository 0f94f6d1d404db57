use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Clone)]
pub struct ImageInfo {
    pub file_name: String,
    pub width: u32,
    pub height: u32,
    /// Width over height, rendered with two decimals ("2.00").
    pub aspect_ratio: String,
    pub size_bytes: u64,
    pub color_mode: String,
    pub format: Option<String>,
}

#[derive(Debug, Serialize, Clone)]
pub struct BatchStats {
    pub count: usize,
    pub total_bytes: u64,
    pub average_bytes: u64,
    pub average_width: f32,
    pub average_height: f32,
    pub images: Vec<ImageInfo>,
}

#[derive(Debug, Serialize, Clone)]
pub struct BatchReport {
    pub stats: BatchStats,
    /// Absent when the batch resolved to zero readable images.
    pub size_chart: Option<String>,
}

/// One upload interaction. Kept in memory for the process lifetime only.
#[derive(Debug, Serialize, Clone)]
pub struct UploadRecord {
    pub file_name: String,
    pub timestamp: i64,
    pub size_bytes: u64,
}

#[derive(Debug, Serialize, Clone, Default)]
pub struct HistorySummary {
    pub count: usize,
    pub total_bytes: u64,
    pub average_bytes: u64,
    pub last_upload: Option<i64>,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct EnhanceParams {
    pub brightness: f32,
    pub contrast: f32,
    pub sharpness: f32,
    pub saturation: f32,
    pub filter: FilterKind,
}

impl Default for EnhanceParams {
    fn default() -> Self {
        EnhanceParams {
            brightness: 1.0,
            contrast: 1.0,
            sharpness: 1.0,
            saturation: 1.0,
            filter: FilterKind::None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    None,
    Blur,
    Contour,
    Detail,
    EdgeEnhance,
    Smooth,
}

#[derive(Debug, Serialize, Clone)]
pub struct EnhancedImage {
    pub data_url: String,
    pub width: u32,
    pub height: u32,
    /// Size of the re-encoded PNG, not of the source file.
    pub size_bytes: u64,
}

#[derive(Debug, Serialize, Clone)]
pub struct DominantColor {
    pub hex: String,
    pub rgb: [u8; 3],
    /// Fraction of sampled pixels assigned to this cluster center.
    pub share: f32,
}

#[derive(Debug, Serialize, Clone)]
pub struct ColorReport {
    pub colors: Vec<DominantColor>,
    pub chart: String,
}

#[derive(Debug, Serialize, Clone, Default)]
pub struct HistogramData {
    pub r: Vec<u32>,
    pub g: Vec<u32>,
    pub b: Vec<u32>,
}

#[derive(Debug, Serialize, Clone)]
pub struct HistogramReport {
    pub histogram: HistogramData,
    pub chart: String,
}
