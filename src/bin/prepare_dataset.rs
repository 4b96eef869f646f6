//! Dataset Preparation CLI
//!
//! Square-crops every image under `<input_dir>/<class_name>/` and re-encodes
//! it as JPEG under a size budget into `<output_dir>/<class_name>/`.
//!
//! Usage:
//! ```
//! prepare_dataset <input_dir> <output_dir> [--target-size-kb 300]
//! ```

use clap::Parser;
use foodlens::core::constants::{
    DEFAULT_TARGET_SIZE_KB, JPEG_MIN_QUALITY, JPEG_QUALITY_STEP, JPEG_START_QUALITY,
};
use foodlens::core::init_tracing;
use foodlens::dataset::{ReencodeOptions, ReencodeOutcome, reencode_directory};
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Command-line arguments for dataset preparation
#[derive(Parser)]
#[command(name = "prepare_dataset")]
#[command(about = "Square-crops and re-encodes a class-per-directory image corpus")]
struct Args {
    /// Root of the raw corpus
    input_dir: PathBuf,

    /// Where processed images are written
    output_dir: PathBuf,

    /// Size budget per image, in kilobytes
    #[arg(long, default_value_t = DEFAULT_TARGET_SIZE_KB)]
    target_size_kb: u64,

    /// JPEG quality of the first attempt
    #[arg(long, default_value_t = JPEG_START_QUALITY)]
    start_quality: u8,

    /// Quality decrement between attempts
    #[arg(long, default_value_t = JPEG_QUALITY_STEP)]
    quality_step: u8,

    /// Lowest quality tried
    #[arg(long, default_value_t = JPEG_MIN_QUALITY)]
    min_quality: u8,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let args = Args::parse();

    if !args.input_dir.is_dir() {
        error!("Input directory not found: {}", args.input_dir.display());
        return Err("Input directory not found".into());
    }

    let options = ReencodeOptions {
        target_size_kb: args.target_size_kb,
        start_quality: args.start_quality,
        quality_step: args.quality_step,
        min_quality: args.min_quality,
    };
    let report = reencode_directory(&args.input_dir, &args.output_dir, &options)?;

    for outcome in &report.outcomes {
        match outcome {
            ReencodeOutcome::Written {
                output_path,
                quality,
                within_budget: false,
                ..
            } => warn!(
                "{} is over budget even at quality {}",
                output_path.display(),
                quality
            ),
            ReencodeOutcome::Failed { input_path, error } => {
                error!("{}: {}", input_path.display(), error)
            }
            _ => {}
        }
    }

    info!(
        "Processed {} file(s): {} written, {} skipped, {} failed",
        report.total(),
        report.written(),
        report.skipped(),
        report.failed()
    );
    Ok(())
}
