use crate::error::AppError;
use crate::models::classify_types::{
    Classification, LABEL_BIODEGRADABLE, LABEL_NON_BIODEGRADABLE,
};
use image::ImageReader;
use ndarray::Array4;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;

/// Input edge expected by the network.
pub const INPUT_SIZE: u32 = 224;

/// Probability at or above which an image is called non-biodegradable.
pub const DECISION_THRESHOLD: f32 = 0.5;

/// Decode and convert to the NHWC tensor the model expects: 224x224 RGB,
/// channel values scaled to [0,1]. The network was trained on plain /255
/// scaling, so no mean/std normalization is applied.
pub fn preprocess_image(path: &Path) -> Result<Array4<f32>, AppError> {
    let img = ImageReader::open(path)
        .map_err(|e| AppError::new(format!("Failed to open image {}: {}", path.display(), e)))?
        .decode()
        .map_err(|e| AppError::new(format!("Failed to decode image {}: {}", path.display(), e)))?;

    let rgb = img
        .resize_exact(INPUT_SIZE, INPUT_SIZE, image::imageops::FilterType::Triangle)
        .to_rgb8();

    let data: Vec<f32> = rgb.into_raw().iter().map(|&v| v as f32 / 255.0).collect();

    let tensor = Array4::from_shape_vec(
        (1, INPUT_SIZE as usize, INPUT_SIZE as usize, 3),
        data,
    )
    .map_err(|e| AppError::new(format!("Failed to create tensor: {}", e)))?;

    Ok(tensor)
}

/// Run the session and extract the single sigmoid output scalar.
pub fn run_inference(session: &mut Session, input: Array4<f32>) -> Result<f32, AppError> {
    let input_name = session.inputs()[0].name().to_string();

    let input_tensor = Value::from_array(input)
        .map_err(|e| AppError::new(format!("Failed to create tensor value: {}", e)))?;

    let outputs = session
        .run(ort::inputs![input_name.as_str() => input_tensor])
        .map_err(|e| AppError::new(format!("Inference failed: {}", e)))?;

    let output_value = outputs
        .values()
        .next()
        .ok_or_else(|| AppError::new("Model produced no outputs"))?;

    let (_, data) = output_value
        .try_extract_tensor::<f32>()
        .map_err(|e| AppError::new(format!("Failed to extract output tensor: {}", e)))?;

    let probability = data
        .first()
        .copied()
        .ok_or_else(|| AppError::new("Model output was empty"))?;

    Ok(probability.clamp(0.0, 1.0))
}

/// Fixed-threshold decision rule. The boundary is inclusive: p == 0.5 is
/// called non-biodegradable. Confidence is the mass on the chosen label.
pub fn decide(probability: f32) -> Classification {
    if probability >= DECISION_THRESHOLD {
        Classification {
            label: LABEL_NON_BIODEGRADABLE,
            confidence: probability,
            probability,
        }
    } else {
        Classification {
            label: LABEL_BIODEGRADABLE,
            confidence: 1.0 - probability,
            probability,
        }
    }
}

pub fn classify_with_session(
    session: &mut Session,
    path: &Path,
) -> Result<Classification, AppError> {
    let tensor = preprocess_image(path)?;
    let probability = run_inference(session, tensor)?;
    Ok(decide(probability))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_probability_is_non_biodegradable() {
        let c = decide(0.5);
        assert_eq!(c.label, LABEL_NON_BIODEGRADABLE);
        assert!((c.confidence - 0.5).abs() < 1e-6);
    }

    #[test]
    fn low_probability_flips_label_and_confidence() {
        let c = decide(0.2);
        assert_eq!(c.label, LABEL_BIODEGRADABLE);
        assert!((c.confidence - 0.8).abs() < 1e-6);
        assert!((c.probability - 0.2).abs() < 1e-6);
    }

    #[test]
    fn confidence_is_max_of_probability_and_complement() {
        for p in [0.0f32, 0.1, 0.49, 0.5, 0.51, 0.9, 1.0] {
            let c = decide(p);
            assert!((c.confidence - p.max(1.0 - p)).abs() < 1e-6);
            assert!((0.5..=1.0).contains(&c.confidence));
        }
    }

    #[test]
    fn preprocess_produces_unit_scaled_nhwc_tensor() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flat.png");
        image::RgbImage::from_pixel(32, 48, image::Rgb([255, 0, 128]))
            .save(&path)
            .unwrap();

        let t = preprocess_image(&path).unwrap();
        assert_eq!(t.shape(), &[1, 224, 224, 3]);
        assert!(t.iter().all(|&v| (0.0..=1.0).contains(&v)));
        // Constant input stays constant through the resize.
        assert!((t[[0, 100, 100, 0]] - 1.0).abs() < 1e-6);
        assert!(t[[0, 100, 100, 1]].abs() < 1e-6);
    }

    #[test]
    fn preprocess_rejects_non_image_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.png");
        std::fs::write(&path, b"not an image at all").unwrap();
        assert!(preprocess_image(&path).is_err());
    }
}
