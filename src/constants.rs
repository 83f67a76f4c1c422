//! Application constants

/// Model input resolution (EfficientNet-B0)
pub const IMAGE_SIZE: usize = 224;

/// Maximum upload size for classification requests (20 MB)
pub const MAX_UPLOAD_SIZE: usize = 20 * 1024 * 1024;

/// Default safetensors weights path, overridable via MODEL_PATH
pub const DEFAULT_MODEL_PATH: &str = "models/real-vs-ai.safetensors";

/// Fallback Hugging Face repo for weights, overridable via MODEL_REPO
pub const DEFAULT_MODEL_REPO: &str = "realcheck/real-vs-ai-detector";

/// Default browser origin allowed by CORS, overridable via ALLOWED_ORIGIN
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";

/// Default listen port, overridable via PORT
pub const DEFAULT_PORT: &str = "8000";
