//! # foodlens
//!
//! Classifies photos of food with an ONNX model and enriches the result with
//! nutrition data from external providers.
//!
//! ## Features
//!
//! - Image normalization to a fixed-size model tensor
//! - ONNX Runtime classification behind a pluggable trait
//! - Confidence gating with a fixed threshold
//! - Nutrition lookup through a primary API with a scraped fallback for gated fields
//! - Offline square-crop JPEG re-encoding of the training corpus
//!
//! ## Modules
//!
//! * [`core`] - Configuration, errors, labels and the classifier adapter
//! * [`domain`] - Image, tensor and classification types
//! * [`processors`] - Normalization, cropping and the confidence gate
//! * [`nutrition`] - Provider chain and per-field merge
//! * [`pipeline`] - Classify-and-enrich orchestration and the response contract
//! * [`dataset`] - Training corpus preparation
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use foodlens::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = FoodLensConfig::from_json_file("foodlens.json")?;
//! let pipeline = FoodPipeline::from_config(&config)?;
//!
//! let response = ClassifyResponse::from_result(pipeline.classify_file("lunch.jpg"));
//! println!("{} {}", response.status_code(), response.to_json()?);
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod dataset;
pub mod domain;
pub mod nutrition;
pub mod pipeline;
pub mod processors;

/// Prelude module for convenient imports.
///
/// ```rust
/// use foodlens::prelude::*;
/// ```
///
/// For provider internals or custom classifiers, import directly from
/// [`crate::nutrition`] and [`crate::core::inference`].
pub mod prelude {
    pub use crate::core::{FoodError, FoodLensConfig, FoodResult, LabelTable};
    pub use crate::dataset::{ReencodeOptions, ReencodeOutcome, crop_and_resize};
    pub use crate::domain::{ClassificationResult, RawImage};
    pub use crate::nutrition::{NutrientValue, NutritionRecord};
    pub use crate::pipeline::{ClassifyResponse, FoodPipeline, PipelineOutcome};
}
