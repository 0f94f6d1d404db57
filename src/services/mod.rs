pub mod chart_service;
pub mod classifier;
pub mod color_service;
pub mod enhance_service;
pub mod exif_service;
pub mod fs_service;
pub mod history;
pub mod preview_service;
pub mod stats_service;
