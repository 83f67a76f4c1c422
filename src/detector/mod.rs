use anyhow::Result;

use crate::constants::IMAGE_SIZE;

/// Pluggable image-authenticity detector.
///
/// Implementations score an image with the probability that it is a real
/// photograph (as opposed to AI-generated).
pub trait Detector: Send + Sync {
    /// Decode uploaded bytes and scale to model input size (224x224 RGB)
    fn scale(&self, bytes: &[u8]) -> Result<Vec<u8>>;

    /// Probability in [0,1] that a scaled RGB image is a real photograph
    fn score(&self, rgb: &[u8]) -> Result<f32>;
}

/// Final classification derived from a raw probability
pub struct Verdict {
    pub prediction: &'static str,
    pub confidence: String,
}

/// Threshold the probability at 0.5 and rescale confidence to the chosen side.
/// Exactly 0.5 classifies as AI-Generated (strict `>`).
pub fn verdict(probability: f32) -> Verdict {
    if probability > 0.5 {
        Verdict {
            prediction: "Real",
            confidence: format!("{:.1}%", probability * 100.0),
        }
    } else {
        Verdict {
            prediction: "AI-Generated",
            confidence: format!("{:.1}%", (1.0 - probability) * 100.0),
        }
    }
}

/// Decode an uploaded image, convert to RGB and resize to the model input size
pub(crate) fn scale_to_input(bytes: &[u8]) -> Result<Vec<u8>> {
    let img = image::load_from_memory(bytes)?;
    let rgb = img.to_rgb8();

    let resized = image::imageops::resize(
        &rgb,
        IMAGE_SIZE as u32,
        IMAGE_SIZE as u32,
        image::imageops::FilterType::Triangle,
    );

    Ok(resized.into_raw())
}

mod efficientnet;
mod fixed;

pub use efficientnet::EfficientNetDetector;
pub use fixed::FixedDetector;
