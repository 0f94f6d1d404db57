use crate::error::AppError;
use crate::models::toolkit_types::{DominantColor, HistogramData};
use base64::Engine;
use image::codecs::png::{CompressionType, PngEncoder};
use image::{ColorType, ImageEncoder};
use std::path::Path;

// One column per intensity level.
const CHART_WIDTH: u32 = 256;
const CHART_HEIGHT: u32 = 100;
const SWATCH_HEIGHT: u32 = 40;

/// EcoCare accent green, used for the size bars.
const BAR_COLOR: [u8; 3] = [95, 167, 119];

/// Per-channel intensity counts of one image. Computed on a downscaled copy;
/// the histogram shape is visually identical and the decode cost is not.
pub fn histogram_data(path: &Path) -> Result<HistogramData, AppError> {
    let img = image::open(path)
        .map_err(|e| AppError::new(format!("Failed to open image: {}", e)))?;

    let rgb = img.thumbnail_exact(200, 200).into_rgb8();

    let mut data = HistogramData {
        r: vec![0; 256],
        g: vec![0; 256],
        b: vec![0; 256],
    };
    for p in rgb.pixels() {
        data.r[p[0] as usize] += 1;
        data.g[p[1] as usize] += 1;
        data.b[p[2] as usize] += 1;
    }
    Ok(data)
}

/// Render the three channel histograms into one chart, blending columns where
/// channels overlap, and return it as a PNG data URL.
pub fn render_histogram(data: &HistogramData) -> Result<String, AppError> {
    let max_val = data
        .r
        .iter()
        .chain(data.g.iter())
        .chain(data.b.iter())
        .copied()
        .max()
        .unwrap_or(1)
        .max(1);
    let scale = CHART_HEIGHT as f32 / max_val as f32;

    // Pre-compute bar heights for all 256 levels
    let mut r_h = [0u8; 256];
    let mut g_h = [0u8; 256];
    let mut b_h = [0u8; 256];
    for i in 0..256 {
        r_h[i] = (data.r[i] as f32 * scale) as u8;
        g_h[i] = (data.g[i] as f32 * scale) as u8;
        b_h[i] = (data.b[i] as f32 * scale) as u8;
    }

    let mut raw = vec![0u8; (CHART_WIDTH * CHART_HEIGHT * 4) as usize];

    for x in 0..CHART_WIDTH {
        let level = x as usize;
        let h_r = r_h[level];
        let h_g = g_h[level];
        let h_b = b_h[level];

        for y in 0..CHART_HEIGHT {
            let inv_y = (CHART_HEIGHT - 1 - y) as u8;

            let in_r = inv_y < h_r;
            let in_g = inv_y < h_g;
            let in_b = inv_y < h_b;

            if !in_r && !in_g && !in_b {
                continue;
            }

            // Integer averaging stands in for alpha blending.
            let mut r: u16 = 0;
            let mut g: u16 = 0;
            let mut b: u16 = 0;
            let mut c: u16 = 0;

            if in_r { r += 255; g += 80; b += 80; c += 1; }
            if in_g { r += 80; g += 200; b += 80; c += 1; }
            if in_b { r += 80; g += 120; b += 255; c += 1; }

            if c > 0 { r /= c; g /= c; b /= c; }

            let idx = ((y * CHART_WIDTH + x) * 4) as usize;
            raw[idx] = r as u8;
            raw[idx + 1] = g as u8;
            raw[idx + 2] = b as u8;
            raw[idx + 3] = 255;
        }
    }

    encode_chart(&raw, CHART_WIDTH, CHART_HEIGHT)
}

/// Horizontal bar split by cluster share, in the order given.
pub fn render_color_bar(colors: &[DominantColor]) -> Result<String, AppError> {
    if colors.is_empty() {
        return Err(AppError::new("No colors to chart"));
    }

    let mut raw = vec![0u8; (CHART_WIDTH * SWATCH_HEIGHT * 4) as usize];
    let mut x0 = 0u32;

    for (i, color) in colors.iter().enumerate() {
        // Last segment absorbs the rounding remainder.
        let x1 = if i == colors.len() - 1 {
            CHART_WIDTH
        } else {
            (x0 + (color.share * CHART_WIDTH as f32).round() as u32).min(CHART_WIDTH)
        };

        for x in x0..x1 {
            for y in 0..SWATCH_HEIGHT {
                let idx = ((y * CHART_WIDTH + x) * 4) as usize;
                raw[idx] = color.rgb[0];
                raw[idx + 1] = color.rgb[1];
                raw[idx + 2] = color.rgb[2];
                raw[idx + 3] = 255;
            }
        }
        x0 = x1;
    }

    encode_chart(&raw, CHART_WIDTH, SWATCH_HEIGHT)
}

/// Size bars for the upload history. An empty history is a value, not an
/// error, matching how batch reports model the zero-image case.
pub fn history_size_chart(sizes: &[u64]) -> Result<Option<String>, AppError> {
    if sizes.is_empty() {
        return Ok(None);
    }
    Ok(Some(render_size_bars(sizes)?))
}

/// One bar per value, scaled against the largest.
pub fn render_size_bars(sizes: &[u64]) -> Result<String, AppError> {
    if sizes.is_empty() {
        return Err(AppError::new("No sizes to chart"));
    }

    let max = sizes.iter().copied().max().unwrap_or(1).max(1);
    let bar_width = (CHART_WIDTH / sizes.len() as u32).max(1);
    let mut raw = vec![0u8; (CHART_WIDTH * CHART_HEIGHT * 4) as usize];

    for (i, &size) in sizes.iter().enumerate() {
        let x0 = i as u32 * bar_width;
        if x0 >= CHART_WIDTH {
            break;
        }
        let x1 = (x0 + bar_width).min(CHART_WIDTH);
        let height = ((size as f64 / max as f64) * CHART_HEIGHT as f64).round() as u32;

        for x in x0..x1 {
            for y in (CHART_HEIGHT - height)..CHART_HEIGHT {
                let idx = ((y * CHART_WIDTH + x) * 4) as usize;
                raw[idx] = BAR_COLOR[0];
                raw[idx + 1] = BAR_COLOR[1];
                raw[idx + 2] = BAR_COLOR[2];
                raw[idx + 3] = 255;
            }
        }
    }

    encode_chart(&raw, CHART_WIDTH, CHART_HEIGHT)
}

fn encode_chart(raw: &[u8], width: u32, height: u32) -> Result<String, AppError> {
    let mut png_bytes = Vec::with_capacity(raw.len());
    PngEncoder::new_with_quality(
        &mut png_bytes,
        CompressionType::Fast, // Speed > Size
        image::codecs::png::FilterType::NoFilter,
    )
    .write_image(raw, width, height, ColorType::Rgba8.into())
    .map_err(|e| AppError::new(e.to_string()))?;

    let b64 = base64::engine::general_purpose::STANDARD.encode(&png_bytes);
    Ok(format!("data:image/png;base64,{}", b64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histogram_counts_every_pixel_of_a_solid_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("solid.png");
        image::RgbImage::from_pixel(256, 256, image::Rgb([250, 120, 5]))
            .save(&path)
            .unwrap();

        let data = histogram_data(&path).unwrap();
        // 200x200 working copy of a solid image: all mass on one level.
        assert_eq!(data.r[250], 40_000);
        assert_eq!(data.g[120], 40_000);
        assert_eq!(data.b[5], 40_000);
        assert_eq!(data.r.iter().sum::<u32>(), 40_000);
    }

    #[test]
    fn rendered_charts_are_png_data_urls() {
        let data = HistogramData {
            r: vec![1; 256],
            g: vec![2; 256],
            b: vec![3; 256],
        };
        assert!(render_histogram(&data)
            .unwrap()
            .starts_with("data:image/png;base64,"));

        let colors = vec![DominantColor {
            hex: "#FF0000".into(),
            rgb: [255, 0, 0],
            share: 1.0,
        }];
        assert!(render_color_bar(&colors)
            .unwrap()
            .starts_with("data:image/png;base64,"));

        assert!(render_size_bars(&[10, 20, 5])
            .unwrap()
            .starts_with("data:image/png;base64,"));
    }

    #[test]
    fn empty_inputs_do_not_render() {
        assert!(render_color_bar(&[]).is_err());
        assert!(render_size_bars(&[]).is_err());
    }

    #[test]
    fn empty_history_yields_no_chart_instead_of_an_error() {
        assert_eq!(history_size_chart(&[]).unwrap(), None);
        assert!(history_size_chart(&[1024])
            .unwrap()
            .unwrap()
            .starts_with("data:image/png;base64,"));
    }
}
