use crate::error::AppError;
use crate::models::toolkit_types::DominantColor;
use image::ImageReader;
use lab::Lab;
use std::path::Path;

/// Edge of the working copy the pixels are sampled from. Dominant colors are
/// stable under downscaling, so there is no point decoding at full size.
const SAMPLE_EDGE: u32 = 128;

/// Upper bound on pixels fed to k-means.
const MAX_SAMPLES: usize = 2000;

const KMEANS_ITERATIONS: usize = 20;

/// Dominant colors of a single image: sample pixels in CIE Lab, cluster them
/// with k-means, then sweep-assign every sample to its nearest centroid to
/// get per-cluster pixel shares.
pub fn dominant_colors(path: &Path, k: usize) -> Result<Vec<DominantColor>, AppError> {
    let img = ImageReader::open(path)
        .map_err(|e| AppError::new(format!("Failed to open image {}: {}", path.display(), e)))?
        .decode()
        .map_err(|e| AppError::new(format!("Failed to decode image {}: {}", path.display(), e)))?;

    let small = img
        .resize(SAMPLE_EDGE, SAMPLE_EDGE, image::imageops::FilterType::Triangle)
        .to_rgb8();

    let samples = sample_lab(&small);
    cluster(&samples, k)
}

fn sample_lab(img: &image::RgbImage) -> Vec<Lab> {
    let total = (img.width() * img.height()) as usize;
    let step = (total / MAX_SAMPLES).max(1);
    img.pixels()
        .step_by(step)
        .take(MAX_SAMPLES)
        .map(|p| Lab::from_rgb(&p.0))
        .collect()
}

fn cluster(samples: &[Lab], k: usize) -> Result<Vec<DominantColor>, AppError> {
    if samples.is_empty() {
        return Err(AppError::new("Image has no pixels"));
    }
    let k = k.clamp(1, samples.len());

    let mut training = Vec::with_capacity(samples.len() * 3);
    for lab in samples {
        training.push(lab.l);
        training.push(lab.a);
        training.push(lab.b);
    }

    let data = ndarray_kentro::Array2::from_shape_vec((samples.len(), 3), training)
        .map_err(|e| AppError::new(format!("Failed to build sample matrix: {}", e)))?;

    let mut kmeans = kentro::KMeans::new(k)
        .with_iterations(KMEANS_ITERATIONS)
        .with_euclidean(true);

    if kmeans.train(data.view(), None).is_err() {
        return Err(AppError::new("K-means training failed"));
    }

    let centroids = kmeans
        .centroids()
        .ok_or_else(|| AppError::new("K-means produced no centroids"))?;

    let mut centers: Vec<[f32; 3]> = Vec::with_capacity(centroids.shape()[0]);
    for i in 0..centroids.shape()[0] {
        centers.push([centroids[[i, 0]], centroids[[i, 1]], centroids[[i, 2]]]);
    }

    let mut counts = vec![0usize; centers.len()];
    for lab in samples {
        counts[nearest_center(lab, &centers)] += 1;
    }

    let mut colors: Vec<DominantColor> = centers
        .iter()
        .zip(counts.iter())
        .filter(|(_, &count)| count > 0)
        .map(|(center, &count)| {
            let rgb = Lab {
                l: center[0],
                a: center[1],
                b: center[2],
            }
            .to_rgb();
            DominantColor {
                hex: format!("#{:02X}{:02X}{:02X}", rgb[0], rgb[1], rgb[2]),
                rgb,
                share: count as f32 / samples.len() as f32,
            }
        })
        .collect();

    colors.sort_by(|a, b| b.share.partial_cmp(&a.share).unwrap_or(std::cmp::Ordering::Equal));
    Ok(colors)
}

/// Index of the centroid closest to `lab` (squared euclidean; sqrt is not
/// needed for comparison).
fn nearest_center(lab: &Lab, centers: &[[f32; 3]]) -> usize {
    let mut best = 0;
    let mut min_dist = f32::MAX;
    for (i, c) in centers.iter().enumerate() {
        let dist =
            (lab.l - c[0]).powi(2) + (lab.a - c[1]).powi(2) + (lab.b - c[2]).powi(2);
        if dist < min_dist {
            min_dist = dist;
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_center_picks_closest() {
        let centers = vec![[0.0, 0.0, 0.0], [100.0, 0.0, 0.0], [50.0, 40.0, -40.0]];
        let near_white = Lab { l: 97.0, a: 1.0, b: -1.0 };
        assert_eq!(nearest_center(&near_white, &centers), 1);
        let near_black = Lab { l: 3.0, a: 0.5, b: 0.5 };
        assert_eq!(nearest_center(&near_black, &centers), 0);
    }

    #[test]
    fn single_cluster_recovers_solid_color() {
        let samples = vec![Lab::from_rgb(&[200, 40, 40]); 64];
        let colors = cluster(&samples, 1).unwrap();
        assert_eq!(colors.len(), 1);
        assert!((colors[0].share - 1.0).abs() < 1e-6);
        // Lab round trip is lossy by at most a couple of steps per channel.
        assert!((colors[0].rgb[0] as i32 - 200).abs() <= 3);
        assert!((colors[0].rgb[1] as i32 - 40).abs() <= 3);
    }

    #[test]
    fn shares_sum_to_one_and_hex_is_well_formed() {
        let mut samples = vec![Lab::from_rgb(&[255, 0, 0]); 40];
        samples.extend(vec![Lab::from_rgb(&[0, 0, 255]); 40]);
        let colors = cluster(&samples, 2).unwrap();

        let total: f32 = colors.iter().map(|c| c.share).sum();
        assert!((total - 1.0).abs() < 1e-4);
        for color in &colors {
            assert_eq!(color.hex.len(), 7);
            assert!(color.hex.starts_with('#'));
            assert!(color.hex[1..].chars().all(|c| c.is_ascii_hexdigit()));
        }
    }

    #[test]
    fn empty_sample_set_is_an_error() {
        assert!(cluster(&[], 3).is_err());
    }
}
