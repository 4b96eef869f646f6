//! Food Classification CLI
//!
//! Classifies food photos and prints one JSON response per image, the same
//! body a web handler would return.
//!
//! Usage:
//! ```
//! classify --model <model.onnx> [--config <config.json>] [--labels <labels.txt>] <images>...
//! ```
//!
//! The nutrition API key is read from `FOODLENS_NUTRITION_API_KEY` unless the
//! configuration file sets it.

use clap::Parser;
use foodlens::core::{FoodLensConfig, init_tracing};
use foodlens::pipeline::{ClassifyResponse, FoodPipeline};
use std::path::PathBuf;
use tracing::{error, info};

/// Command-line arguments for the classifier
#[derive(Parser)]
#[command(name = "classify")]
#[command(about = "Classifies food photos and looks up their nutrition")]
struct Args {
    /// Path to the ONNX model; overrides the configuration file
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Label file, one category name per line; overrides the configuration file
    #[arg(short, long)]
    labels: Option<PathBuf>,

    /// Minimum confidence to accept a category
    #[arg(short, long)]
    threshold: Option<f32>,

    /// Image file paths to process
    #[arg(required = true)]
    images: Vec<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => FoodLensConfig::from_json_file(path)?,
        None => FoodLensConfig::default().with_env_overrides(),
    };
    if let Some(model) = args.model {
        config.model.model_path = Some(model);
    }
    if let Some(labels) = args.labels {
        config.model.labels_path = Some(labels);
    }
    if let Some(threshold) = args.threshold {
        config.gate.confidence_threshold = threshold;
    }
    if config.model.model_path.is_none() {
        error!("No model given; pass --model or set model.model_path in the configuration");
        return Err("No model given".into());
    }

    let pipeline = FoodPipeline::from_config(&config)?;
    info!("Classifying {} image(s)", args.images.len());

    let mut failures = 0usize;
    for path in &args.images {
        let response = ClassifyResponse::from_result(pipeline.classify_file(path));
        if response.status_code() >= 500 {
            failures += 1;
        }
        info!(
            "{}: {} ({})",
            path.display(),
            response.message(),
            response.status_code()
        );
        println!("{}", response.to_json()?);
    }

    if failures > 0 {
        error!("{} image(s) failed with an internal error", failures);
        return Err(format!("{failures} image(s) failed").into());
    }
    Ok(())
}
