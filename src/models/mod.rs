pub mod classify_types;
pub mod exif_types;
pub mod toolkit_types;
