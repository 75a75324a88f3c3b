use std::path::PathBuf;

use thiserror::Error;

/// Per-request failures. None of these affect shared state; the next upload
/// goes through the pipeline as normal.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no image was uploaded")]
    EmptyUpload,

    #[error("upload exceeds the {limit} byte limit")]
    UploadTooLarge { limit: usize },

    #[error("could not read upload: {0}")]
    Upload(#[from] std::io::Error),

    #[error("unsupported image format: {0} (expected PNG or JPEG)")]
    UnsupportedFormat(String),

    #[error("could not decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("tensor shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch { expected: [usize; 4], actual: [usize; 4] },

    #[error("inference failed: {0}")]
    Inference(String),
}

/// Startup failures while obtaining or verifying the model artifact.
/// Fatal to the server process.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("model artifact not found at {0} and no download URL is configured")]
    ArtifactMissing(PathBuf),

    #[error("download failed: {0}")]
    Download(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("could not parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid model: {0}")]
    InvalidModel(String),

    #[error("label set has {labels} entries but the model outputs {outputs} values")]
    LabelCount { labels: usize, outputs: usize },

    #[error("label order mismatch: configured {expected:?}, artifact declares {found:?}")]
    LabelMismatch { expected: Vec<String>, found: Vec<String> },

    #[error("model expects {expected} inputs but the preprocessor produces {actual}")]
    InputSize { expected: usize, actual: usize },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
