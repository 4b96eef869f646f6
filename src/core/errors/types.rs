//! Core error type definitions.

use crate::core::config::ConfigError;
use thiserror::Error;

/// Stage of image or tensor processing in which an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    /// Decoding raw bytes into pixels.
    Decode,
    /// Resizing to the model input size.
    Resize,
    /// Scaling pixel values into the model range.
    Normalization,
    /// Square cropping for the training corpus.
    Crop,
    /// JPEG re-encoding under a byte budget.
    Encode,
    /// Tensor construction or reshaping.
    TensorOperation,
    /// Interpreting model output.
    PostProcessing,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStage::Decode => write!(f, "decode"),
            ProcessingStage::Resize => write!(f, "resize"),
            ProcessingStage::Normalization => write!(f, "normalization"),
            ProcessingStage::Crop => write!(f, "crop"),
            ProcessingStage::Encode => write!(f, "encode"),
            ProcessingStage::TensorOperation => write!(f, "tensor operation"),
            ProcessingStage::PostProcessing => write!(f, "post-processing"),
        }
    }
}

/// Errors that can leave a pipeline component.
///
/// Business outcomes such as "not recognized" or "nutrition unavailable" are
/// not errors; they are variants of [`crate::pipeline::PipelineOutcome`].
#[derive(Error, Debug)]
pub enum FoodError {
    /// The uploaded bytes are not a supported image or are truncated.
    #[error("image decode")]
    ImageDecode(#[source] image::ImageError),

    /// Error during a processing stage.
    #[error("{kind} failed: {context}")]
    Processing {
        /// The stage where the error occurred.
        kind: ProcessingStage,
        /// Additional context about the error.
        context: String,
        /// The underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The classifier failed to produce a valid distribution.
    #[error("inference failed for model '{model}': {context}")]
    Inference {
        /// Name of the model that failed.
        model: String,
        /// What was being attempted.
        context: String,
        /// The underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A caller violated an operation contract.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// Description of the violation.
        message: String,
    },

    /// Configuration could not be loaded or failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Error from the ONNX Runtime session.
    #[error(transparent)]
    Session(#[from] ort::Error),

    /// Error from tensor shape handling.
    #[error("tensor operation")]
    Tensor(#[from] ndarray::ShapeError),

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

impl FoodError {
    /// Returns true when the error stems from an unreadable upload.
    pub fn is_decode_error(&self) -> bool {
        matches!(self, FoodError::ImageDecode(_))
    }
}
