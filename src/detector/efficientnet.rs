use anyhow::{Result, anyhow};
use candle_core::{DType, Device, Tensor};
use candle_nn::{Module, VarBuilder};
use candle_transformers::models::efficientnet::{EfficientNet, MBConvConfig};
use hf_hub::{Repo, RepoType, api::sync::Api};
use std::path::{Path, PathBuf};

use super::{Detector, scale_to_input};
use crate::constants::IMAGE_SIZE;

// EfficientNet preprocessing: scale to [0,1], then ImageNet channel statistics
// (matches the transform the classifier head was trained with).
const MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Real-vs-AI detector: EfficientNet-B0 trunk with a single-logit head.
/// Weights are loaded from a local safetensors file when present, otherwise
/// fetched from the configured Hugging Face repo.
pub struct EfficientNetDetector {
    model: EfficientNet,
    device: Device,
}

impl EfficientNetDetector {
    pub fn load(model_path: &Path, model_repo: &str) -> Result<Self> {
        #[cfg(feature = "metal")]
        let device = Device::new_metal(0).unwrap_or(Device::Cpu);
        #[cfg(not(feature = "metal"))]
        let device = Device::Cpu;

        log::info!("Loading real-vs-AI detection model on {:?}", device);

        let weights = Self::locate_weights(model_path, model_repo)?;

        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[weights], DType::F32, &device)? };
        let model = EfficientNet::new(vb, MBConvConfig::b0(), 1)?; // single "is real" logit

        log::info!("Detection model loaded successfully");

        Ok(Self { model, device })
    }

    fn locate_weights(model_path: &Path, model_repo: &str) -> Result<PathBuf> {
        if model_path.exists() {
            return Ok(model_path.to_path_buf());
        }

        log::info!(
            "Weights not found at {:?}, fetching from {}",
            model_path,
            model_repo
        );

        let api = Api::new()?;
        let repo = api.repo(Repo::new(model_repo.to_string(), RepoType::Model));
        Ok(repo.get("model.safetensors")?)
    }

    fn preprocess(&self, rgb: &[u8]) -> Result<Tensor> {
        let mut data = vec![0f32; 3 * IMAGE_SIZE * IMAGE_SIZE];

        for i in 0..(IMAGE_SIZE * IMAGE_SIZE) {
            let r = rgb[i * 3] as f32 / 255.0;
            let g = rgb[i * 3 + 1] as f32 / 255.0;
            let b = rgb[i * 3 + 2] as f32 / 255.0;

            // CHW format with normalization
            data[i] = (r - MEAN[0]) / STD[0];
            data[IMAGE_SIZE * IMAGE_SIZE + i] = (g - MEAN[1]) / STD[1];
            data[2 * IMAGE_SIZE * IMAGE_SIZE + i] = (b - MEAN[2]) / STD[2];
        }

        // Single-element batch
        let tensor = Tensor::from_vec(data, (1, 3, IMAGE_SIZE, IMAGE_SIZE), &self.device)?;
        Ok(tensor)
    }
}

impl Detector for EfficientNetDetector {
    fn scale(&self, bytes: &[u8]) -> Result<Vec<u8>> {
        scale_to_input(bytes)
    }

    fn score(&self, rgb: &[u8]) -> Result<f32> {
        if rgb.len() != IMAGE_SIZE * IMAGE_SIZE * 3 {
            return Err(anyhow!(
                "Expected {}x{}x3 RGB, got {} bytes",
                IMAGE_SIZE,
                IMAGE_SIZE,
                rgb.len()
            ));
        }

        let input = self.preprocess(rgb)?;
        let logits = self.model.forward(&input)?;

        // Sigmoid over the single output unit
        let probs = candle_nn::ops::sigmoid(&logits)?;
        let values: Vec<f32> = probs.flatten_all()?.to_vec1()?;

        values
            .first()
            .copied()
            .ok_or_else(|| anyhow!("Model produced no output"))
    }
}
