use anyhow::Result;

use super::{Detector, scale_to_input};

/// Detector that always returns a fixed probability - for testing or opt-out
pub struct FixedDetector {
    probability: f32,
}

impl FixedDetector {
    pub fn new(probability: f32) -> Self {
        Self { probability }
    }
}

impl Default for FixedDetector {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl Detector for FixedDetector {
    fn scale(&self, bytes: &[u8]) -> Result<Vec<u8>> {
        // Uploads still have to decode, so malformed images error the same way
        scale_to_input(bytes)
    }

    fn score(&self, _rgb: &[u8]) -> Result<f32> {
        Ok(self.probability)
    }
}
