use std::path::PathBuf;
use thiserror::Error;

/// Result type for ecgscan operations
pub type Result<T> = std::result::Result<T, EcgError>;

/// Error types for ecgscan operations
///
/// Every variant is fatal for the image being processed: the pipeline
/// never returns a partial digitization or decision.
#[derive(Error, Debug)]
pub enum EcgError {
    /// Image path does not exist
    #[error("Image not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// Image exists but cannot be decoded into a usable pixel grid
    #[error("Could not read image: {0}")]
    ImageReadError(String),

    /// Classifier weight resource is absent at startup
    #[error("Model not found: {}. Please place the model weights at this path", .0.display())]
    ModelResourceMissing(PathBuf),

    /// Classifier failed while loading weights or predicting
    #[error("Inference failed: {0}")]
    InferenceFailure(String),

    /// Malformed threshold or extractor configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<image::ImageError> for EcgError {
    fn from(e: image::ImageError) -> Self {
        EcgError::ImageReadError(format!("{}", e))
    }
}
