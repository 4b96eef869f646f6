//! The classify-and-enrich pipeline.
//!
//! [`FoodPipeline`] runs image normalization, classification, the confidence
//! gate and nutrition resolution in sequence. [`ClassifyResponse`] maps the
//! result onto the JSON contract served to clients.

pub mod orchestrator;
pub mod response;

pub use orchestrator::{FoodPipeline, PipelineOutcome};
pub use response::{ClassifyResponse, ErrorKind};
