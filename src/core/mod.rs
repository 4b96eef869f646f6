//! Core building blocks shared by the pipeline and the dataset tools.
//!
//! This module contains:
//! - Configuration loading and validation
//! - Constants used throughout the crate
//! - Error handling
//! - The classifier seam and its ONNX Runtime implementation
//! - The food label table

pub mod config;
pub mod constants;
pub mod errors;
pub mod inference;
pub mod labels;

pub use config::{ConfigError, ConfigValidator, FoodLensConfig};
pub use errors::{FoodError, FoodResult, ProcessingStage};
pub use inference::{FoodClassifier, OrtClassifier, OutputActivation, load_session};
pub use labels::LabelTable;

/// Initializes the tracing subscriber for logging.
///
/// Sets up the subscriber with an environment filter (`RUST_LOG`) and a
/// formatting layer. Binaries call this once at startup.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
