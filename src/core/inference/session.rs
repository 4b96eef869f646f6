//! Helpers for creating ONNX Runtime sessions.

use crate::core::FoodError;
use crate::core::config::{OrtGraphOptimizationLevel, OrtSessionConfig};
use ort::logging::LogLevel;
use ort::session::Session;
use ort::session::builder::{GraphOptimizationLevel, SessionBuilder};
use std::path::Path;

/// Loads a session with default options.
pub fn load_session(model_path: impl AsRef<Path>) -> Result<Session, FoodError> {
    build_session(model_path, None)
}

/// Loads a session, applying the given options when present.
pub fn build_session(
    model_path: impl AsRef<Path>,
    config: Option<&OrtSessionConfig>,
) -> Result<Session, FoodError> {
    let path = model_path.as_ref();
    let builder = Session::builder()?.with_log_level(LogLevel::Error)?;
    let builder = match config {
        Some(cfg) if !cfg.is_runtime_default() => apply_ort_config(builder, cfg)?,
        _ => builder,
    };
    builder.commit_from_file(path).map_err(|e| {
        FoodError::inference_error(
            &path.display().to_string(),
            "failed to create ONNX session; verify the model file exists and is readable",
            e,
        )
    })
}

fn apply_ort_config(
    mut builder: SessionBuilder,
    cfg: &OrtSessionConfig,
) -> Result<SessionBuilder, ort::Error> {
    if let Some(intra) = cfg.intra_threads {
        builder = builder.with_intra_threads(intra)?;
    }
    if let Some(inter) = cfg.inter_threads {
        builder = builder.with_inter_threads(inter)?;
    }
    if let Some(level) = cfg.optimization_level {
        let mapped = match level {
            OrtGraphOptimizationLevel::Disabled => GraphOptimizationLevel::Disable,
            OrtGraphOptimizationLevel::Basic => GraphOptimizationLevel::Level1,
            OrtGraphOptimizationLevel::Extended => GraphOptimizationLevel::Level2,
            OrtGraphOptimizationLevel::All => GraphOptimizationLevel::Level3,
        };
        builder = builder.with_optimization_level(mapped)?;
    }
    Ok(builder)
}
