//! Domain-level structures shared across the pipeline.
//!
//! Request-scoped values: the uploaded image, the model-ready tensor, the
//! classifier distribution and the gated classification result. Nutrition
//! records live in [`crate::nutrition`].

pub mod classification;
pub mod image;

pub use classification::{CategoryDistribution, ClassificationResult};
pub use self::image::{NormalizedTensor, RawImage};
