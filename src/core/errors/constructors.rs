//! Helper constructors for [`FoodError`].
//!
//! These keep call sites short while still chaining the underlying cause:
//!
//! ```rust
//! use foodlens::core::FoodError;
//!
//! let error = FoodError::inference_error(
//!     "foodcf",
//!     "output tensor has 3 dimensions, expected 2",
//!     foodlens::core::errors::SimpleError::new("invalid output shape"),
//! );
//! assert!(error.to_string().contains("foodcf"));
//! ```

use super::types::{FoodError, ProcessingStage};

/// Minimal error carrying only a message, used as a `source` when no richer
/// underlying error exists.
#[derive(Debug, Clone)]
pub struct SimpleError {
    message: String,
}

impl SimpleError {
    /// Creates a new error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for SimpleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for SimpleError {}

impl FoodError {
    /// Creates a processing error for the given stage.
    pub fn processing(
        kind: ProcessingStage,
        context: impl Into<String>,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Processing {
            kind,
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates a tensor operation error.
    pub fn tensor_operation(
        context: impl Into<String>,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::processing(ProcessingStage::TensorOperation, context, error)
    }

    /// Creates an encode error for the re-encoder.
    pub fn encode_error(
        context: impl Into<String>,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::processing(ProcessingStage::Encode, context, error)
    }

    /// Creates an inference error attributed to a model.
    ///
    /// # Arguments
    ///
    /// * `model` - Name of the model that failed.
    /// * `context` - What was being attempted.
    /// * `error` - The underlying cause.
    pub fn inference_error(
        model: &str,
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Inference {
            model: model.to_string(),
            context: context.to_string(),
            source: Box::new(error),
        }
    }

    /// Creates a contract violation error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}
