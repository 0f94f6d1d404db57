use crate::error::AppError;
use crate::models::toolkit_types::{EnhanceParams, FilterKind};
use base64::Engine;
use image::codecs::png::PngEncoder;
use image::{imageops, ColorType, DynamicImage, ImageEncoder, ImageReader, RgbImage};
use std::path::Path;

// 3x3 kernels for the named filters, pre-divided by their scale.
const SMOOTH_KERNEL: [f32; 9] = [
    1.0 / 13.0, 1.0 / 13.0, 1.0 / 13.0,
    1.0 / 13.0, 5.0 / 13.0, 1.0 / 13.0,
    1.0 / 13.0, 1.0 / 13.0, 1.0 / 13.0,
];
const DETAIL_KERNEL: [f32; 9] = [
    0.0, -1.0 / 6.0, 0.0,
    -1.0 / 6.0, 10.0 / 6.0, -1.0 / 6.0,
    0.0, -1.0 / 6.0, 0.0,
];
const EDGE_ENHANCE_KERNEL: [f32; 9] = [
    -0.5, -0.5, -0.5,
    -0.5, 5.0, -0.5,
    -0.5, -0.5, -0.5,
];
const LAPLACIAN_KERNEL: [f32; 9] = [
    -1.0, -1.0, -1.0,
    -1.0, 8.0, -1.0,
    -1.0, -1.0, -1.0,
];

const BLUR_SIGMA: f32 = 2.0;

pub fn load_rgb(path: &Path) -> Result<RgbImage, AppError> {
    let img = ImageReader::open(path)
        .map_err(|e| AppError::new(format!("Failed to open image {}: {}", path.display(), e)))?
        .decode()
        .map_err(|e| AppError::new(format!("Failed to decode image {}: {}", path.display(), e)))?;
    Ok(img.to_rgb8())
}

/// Apply the four scalar adjustments in order, then the optional named
/// filter. Each adjustment interpolates between a degenerate image and the
/// current result; a factor of exactly 1.0 is skipped outright, so all-1.0
/// with no filter returns the input pixels untouched.
pub fn enhance(img: &RgbImage, params: &EnhanceParams) -> RgbImage {
    let mut out = img.clone();

    if params.brightness != 1.0 {
        out = adjust_brightness(&out, params.brightness);
    }
    if params.contrast != 1.0 {
        out = adjust_contrast(&out, params.contrast);
    }
    if params.sharpness != 1.0 {
        out = adjust_sharpness(&out, params.sharpness);
    }
    if params.saturation != 1.0 {
        out = adjust_saturation(&out, params.saturation);
    }

    apply_filter(out, params.filter)
}

pub fn enhance_file(path: &Path, params: &EnhanceParams) -> Result<(RgbImage, Vec<u8>), AppError> {
    let src = load_rgb(path)?;
    let out = enhance(&src, params);
    let png = encode_png(&out)?;
    Ok((out, png))
}

fn apply_filter(img: RgbImage, filter: FilterKind) -> RgbImage {
    match filter {
        FilterKind::None => img,
        FilterKind::Blur => DynamicImage::ImageRgb8(img).blur(BLUR_SIGMA).to_rgb8(),
        FilterKind::Contour => contour(&img),
        FilterKind::Detail => imageops::filter3x3(&img, &DETAIL_KERNEL),
        FilterKind::EdgeEnhance => imageops::filter3x3(&img, &EDGE_ENHANCE_KERNEL),
        FilterKind::Smooth => imageops::filter3x3(&img, &SMOOTH_KERNEL),
    }
}

/// Interpolate one channel away from a base value. Factor 0.0 yields the
/// base, 1.0 the original, above 1.0 an exaggerated version.
fn scale_channel(base: f32, value: f32, factor: f32) -> u8 {
    (base + (value - base) * factor).round().clamp(0.0, 255.0) as u8
}

fn luma(px: &image::Rgb<u8>) -> f32 {
    0.299 * px[0] as f32 + 0.587 * px[1] as f32 + 0.114 * px[2] as f32
}

fn adjust_brightness(img: &RgbImage, factor: f32) -> RgbImage {
    let mut out = img.clone();
    for px in out.pixels_mut() {
        for c in px.0.iter_mut() {
            *c = scale_channel(0.0, *c as f32, factor);
        }
    }
    out
}

fn adjust_contrast(img: &RgbImage, factor: f32) -> RgbImage {
    let mean = mean_luma(img);
    let mut out = img.clone();
    for px in out.pixels_mut() {
        for c in px.0.iter_mut() {
            *c = scale_channel(mean, *c as f32, factor);
        }
    }
    out
}

/// The degenerate image for sharpness is a box-smoothed copy; factors above
/// 1.0 push pixels away from it, which sharpens.
fn adjust_sharpness(img: &RgbImage, factor: f32) -> RgbImage {
    let smooth: RgbImage = imageops::filter3x3(img, &SMOOTH_KERNEL);
    let mut out = img.clone();
    for (px, base) in out.pixels_mut().zip(smooth.pixels()) {
        for (c, b) in px.0.iter_mut().zip(base.0.iter()) {
            *c = scale_channel(*b as f32, *c as f32, factor);
        }
    }
    out
}

fn adjust_saturation(img: &RgbImage, factor: f32) -> RgbImage {
    let mut out = img.clone();
    for px in out.pixels_mut() {
        let gray = luma(px);
        for c in px.0.iter_mut() {
            *c = scale_channel(gray, *c as f32, factor);
        }
    }
    out
}

fn mean_luma(img: &RgbImage) -> f32 {
    let count = (img.width() as u64 * img.height() as u64).max(1);
    let sum: f64 = img.pixels().map(|p| luma(p) as f64).sum();
    (sum / count as f64) as f32
}

/// Laplacian edge response, inverted: flat regions go white, edges draw as
/// dark outlines.
fn contour(img: &RgbImage) -> RgbImage {
    let mut edges: RgbImage = imageops::filter3x3(img, &LAPLACIAN_KERNEL);
    for px in edges.pixels_mut() {
        for c in px.0.iter_mut() {
            *c = 255 - *c;
        }
    }
    edges
}

pub fn encode_png(img: &RgbImage) -> Result<Vec<u8>, AppError> {
    let mut png_bytes = Vec::new();
    PngEncoder::new(&mut png_bytes)
        .write_image(img.as_raw(), img.width(), img.height(), ColorType::Rgb8.into())
        .map_err(|e| AppError::new(format!("Failed to encode PNG: {}", e)))?;
    Ok(png_bytes)
}

pub fn to_data_url(png: &[u8]) -> String {
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(png)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn test_image() -> RgbImage {
        RgbImage::from_fn(16, 12, |x, y| {
            Rgb([(x * 16) as u8, (y * 20) as u8, ((x + y) * 7) as u8])
        })
    }

    #[test]
    fn neutral_params_are_pixel_identical() {
        let img = test_image();
        let out = enhance(&img, &EnhanceParams::default());
        assert_eq!(img.as_raw(), out.as_raw());
    }

    #[test]
    fn zero_brightness_blacks_out() {
        let img = test_image();
        let out = adjust_brightness(&img, 0.0);
        assert!(out.pixels().all(|p| p.0 == [0, 0, 0]));
    }

    #[test]
    fn zero_saturation_is_grayscale() {
        let img = test_image();
        let out = adjust_saturation(&img, 0.0);
        assert!(out.pixels().all(|p| p[0] == p[1] && p[1] == p[2]));
    }

    #[test]
    fn zero_contrast_flattens_to_mean() {
        let img = test_image();
        let mean = mean_luma(&img).round().clamp(0.0, 255.0) as u8;
        let out = adjust_contrast(&img, 0.0);
        assert!(out.pixels().all(|p| p.0 == [mean, mean, mean]));
    }

    #[test]
    fn filters_preserve_dimensions() {
        let img = test_image();
        for filter in [
            FilterKind::Blur,
            FilterKind::Contour,
            FilterKind::Detail,
            FilterKind::EdgeEnhance,
            FilterKind::Smooth,
        ] {
            let out = apply_filter(img.clone(), filter);
            assert_eq!((out.width(), out.height()), (img.width(), img.height()));
        }
    }

    #[test]
    fn encode_png_round_trips() {
        let img = test_image();
        let png = encode_png(&img).unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_rgb8();
        assert_eq!(img.as_raw(), decoded.as_raw());
    }

    #[test]
    fn data_url_has_png_prefix() {
        let url = to_data_url(&[1, 2, 3]);
        assert!(url.starts_with("data:image/png;base64,"));
    }
}
