//! Square-crop JPEG re-encoder.

use crate::core::config::ConfigError;
use crate::core::constants::{
    DEFAULT_TARGET_SIZE_KB, JPEG_MIN_QUALITY, JPEG_QUALITY_STEP, JPEG_START_QUALITY,
};
use crate::core::errors::SimpleError;
use crate::core::{FoodError, ProcessingStage};
use crate::processors::center_square;
use image::codecs::jpeg::JpegEncoder;
use image::{ImageReader, RgbImage};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Parameters of the quality search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReencodeOptions {
    /// Byte budget per output file, in kilobytes.
    pub target_size_kb: u64,
    /// Quality of the first attempt.
    pub start_quality: u8,
    /// Quality decrement between attempts.
    pub quality_step: u8,
    /// Lowest quality tried.
    pub min_quality: u8,
}

impl Default for ReencodeOptions {
    fn default() -> Self {
        Self {
            target_size_kb: DEFAULT_TARGET_SIZE_KB,
            start_quality: JPEG_START_QUALITY,
            quality_step: JPEG_QUALITY_STEP,
            min_quality: JPEG_MIN_QUALITY,
        }
    }
}

impl ReencodeOptions {
    /// Default options with a different byte budget.
    pub fn with_target_size_kb(target_size_kb: u64) -> Self {
        Self {
            target_size_kb,
            ..Self::default()
        }
    }

    /// Budget in bytes.
    pub fn target_bytes(&self) -> u64 {
        self.target_size_kb.saturating_mul(1024)
    }

    /// Qualities in the order they are tried.
    pub fn qualities(&self) -> impl Iterator<Item = u8> {
        (self.min_quality..=self.start_quality)
            .rev()
            .step_by(self.quality_step.max(1) as usize)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_size_kb == 0 {
            return Err(ConfigError::InvalidConfig {
                message: "reencode.target_size_kb must be greater than 0".to_string(),
            });
        }
        if !(1..=100).contains(&self.start_quality) {
            return Err(ConfigError::InvalidConfig {
                message: format!(
                    "reencode.start_quality must be in 1..=100, got {}",
                    self.start_quality
                ),
            });
        }
        if self.quality_step == 0 {
            return Err(ConfigError::InvalidConfig {
                message: "reencode.quality_step must be at least 1".to_string(),
            });
        }
        if self.min_quality == 0 || self.min_quality > self.start_quality {
            return Err(ConfigError::InvalidConfig {
                message: format!(
                    "reencode.min_quality must be in 1..={}, got {}",
                    self.start_quality, self.min_quality
                ),
            });
        }
        Ok(())
    }
}

/// What happened to one input file.
#[derive(Debug)]
pub enum ReencodeOutcome {
    /// A JPEG was written.
    Written {
        output_path: PathBuf,
        /// Quality of the written encoding.
        quality: u8,
        /// Size of the written file.
        bytes: u64,
        /// False when even the lowest quality exceeded the budget.
        within_budget: bool,
    },
    /// The input could not be read as an image.
    Skipped { input_path: PathBuf, reason: String },
    /// The output could not be produced or written.
    Failed {
        input_path: PathBuf,
        error: FoodError,
    },
}

impl ReencodeOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, ReencodeOutcome::Written { .. })
    }
}

/// Aggregate of a directory run.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<ReencodeOutcome>,
}

impl BatchReport {
    pub fn written(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_written()).count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, ReencodeOutcome::Skipped { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, ReencodeOutcome::Failed { .. }))
            .count()
    }

    /// Written files that did not fit the budget.
    pub fn over_budget(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| {
                matches!(
                    o,
                    ReencodeOutcome::Written {
                        within_budget: false,
                        ..
                    }
                )
            })
            .count()
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }
}

/// Crops and re-encodes one image with the default quality search.
///
/// The output goes to `output_dir/<class_name>/<stem>.jpg`, where
/// `class_name` is the name of the input's parent directory.
///
/// # Examples
///
/// ```rust,no_run
/// use foodlens::dataset::{crop_and_resize, ReencodeOutcome};
/// use std::path::Path;
///
/// let outcome = crop_and_resize(Path::new("raw/banana/img_01.png"), Path::new("processed"), 300);
/// if let ReencodeOutcome::Written { output_path, quality, .. } = outcome {
///     println!("{} at quality {}", output_path.display(), quality);
/// }
/// ```
pub fn crop_and_resize(input_path: &Path, output_dir: &Path, target_size_kb: u64) -> ReencodeOutcome {
    crop_and_resize_with(
        input_path,
        output_dir,
        &ReencodeOptions::with_target_size_kb(target_size_kb),
    )
}

/// Crops and re-encodes one image.
pub fn crop_and_resize_with(
    input_path: &Path,
    output_dir: &Path,
    options: &ReencodeOptions,
) -> ReencodeOutcome {
    let rgb = match decode_rgb(input_path) {
        Ok(rgb) => rgb,
        Err(reason) => {
            debug!(path = %input_path.display(), %reason, "skipping unreadable image");
            return ReencodeOutcome::Skipped {
                input_path: input_path.to_path_buf(),
                reason,
            };
        }
    };

    match write_square_jpeg(input_path, rgb, output_dir, options) {
        Ok(outcome) => outcome,
        Err(error) => {
            warn!(path = %input_path.display(), error = %error, "failed to re-encode image");
            ReencodeOutcome::Failed {
                input_path: input_path.to_path_buf(),
                error,
            }
        }
    }
}

/// Re-encodes every file under `input_root`, in parallel.
///
/// Only an unreadable `input_root` or invalid options are errors; problems
/// with individual files are reported as outcomes. Inputs that map to the
/// same output file (same class and stem) are written once: the first in
/// path order wins and the rest are skipped.
pub fn reencode_directory(
    input_root: &Path,
    output_dir: &Path,
    options: &ReencodeOptions,
) -> Result<BatchReport, FoodError> {
    options.validate()?;

    let mut files = Vec::new();
    collect_files(input_root, &mut files, true)?;
    files.sort();
    info!(
        root = %input_root.display(),
        files = files.len(),
        target_kb = options.target_size_kb,
        "re-encoding corpus"
    );

    let collisions = output_collisions(&files, output_dir);
    let outcomes: Vec<ReencodeOutcome> = files
        .par_iter()
        .enumerate()
        .map(|(idx, path)| match collisions.get(&idx) {
            Some(reason) => ReencodeOutcome::Skipped {
                input_path: path.clone(),
                reason: reason.clone(),
            },
            None => crop_and_resize_with(path, output_dir, options),
        })
        .collect();

    let report = BatchReport { outcomes };
    info!(
        written = report.written(),
        skipped = report.skipped(),
        failed = report.failed(),
        over_budget = report.over_budget(),
        "re-encoding finished"
    );
    Ok(report)
}

/// Indices of files whose output path is already claimed by an earlier
/// file, with the skip reason.
fn output_collisions(files: &[PathBuf], output_dir: &Path) -> HashMap<usize, String> {
    let mut claimed: HashMap<PathBuf, &Path> = HashMap::new();
    let mut collisions = HashMap::new();
    for (idx, path) in files.iter().enumerate() {
        let Ok(output_path) = output_path_for(path, output_dir) else {
            continue;
        };
        match claimed.get(&output_path) {
            Some(first) => {
                warn!(
                    path = %path.display(),
                    first = %first.display(),
                    output = %output_path.display(),
                    "output path already taken"
                );
                collisions.insert(
                    idx,
                    format!("output path collides with {}", first.display()),
                );
            }
            None => {
                claimed.insert(output_path, path);
            }
        }
    }
    collisions
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>, is_root: bool) -> Result<(), FoodError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if is_root => return Err(e.into()),
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "skipping unreadable directory");
            return Ok(());
        }
    };
    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            collect_files(&path, files, false)?;
        } else if path.is_file() {
            files.push(path);
        }
    }
    Ok(())
}

fn decode_rgb(path: &Path) -> Result<RgbImage, String> {
    let reader = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| e.to_string())?;
    let img = reader.decode().map_err(|e| e.to_string())?;
    Ok(img.to_rgb8())
}

fn output_path_for(input_path: &Path, output_dir: &Path) -> Result<PathBuf, FoodError> {
    let class_name = input_path
        .parent()
        .and_then(|p| p.file_name())
        .ok_or_else(|| {
            FoodError::invalid_input(format!(
                "{} has no class directory",
                input_path.display()
            ))
        })?;
    let stem = input_path.file_stem().ok_or_else(|| {
        FoodError::invalid_input(format!("{} has no file name", input_path.display()))
    })?;
    let mut file_name = stem.to_os_string();
    file_name.push(".jpg");
    Ok(output_dir.join(class_name).join(file_name))
}

fn write_square_jpeg(
    input_path: &Path,
    rgb: RgbImage,
    output_dir: &Path,
    options: &ReencodeOptions,
) -> Result<ReencodeOutcome, FoodError> {
    let output_path = output_path_for(input_path, output_dir)?;
    let square = center_square(rgb)?;
    let (buffer, quality, within_budget) = encode_within_budget(&square, options)?;

    if let Some(class_dir) = output_path.parent() {
        std::fs::create_dir_all(class_dir)?;
    }
    std::fs::write(&output_path, &buffer)?;

    debug!(
        path = %output_path.display(),
        quality,
        bytes = buffer.len(),
        within_budget,
        "wrote image"
    );
    Ok(ReencodeOutcome::Written {
        output_path,
        quality,
        bytes: buffer.len() as u64,
        within_budget,
    })
}

/// Lowers the quality step by step until the encoding fits the budget.
///
/// Returns the first fitting encoding, or the lowest-quality attempt when
/// none fits.
fn encode_within_budget(
    img: &RgbImage,
    options: &ReencodeOptions,
) -> Result<(Vec<u8>, u8, bool), FoodError> {
    let budget = options.target_bytes();
    let mut last = None;
    for quality in options.qualities() {
        let buffer = encode_jpeg(img, quality)?;
        if buffer.len() as u64 <= budget {
            return Ok((buffer, quality, true));
        }
        last = Some((buffer, quality));
    }
    last.map(|(buffer, quality)| (buffer, quality, false))
        .ok_or_else(|| {
            FoodError::processing(
                ProcessingStage::Encode,
                "no JPEG quality to try",
                SimpleError::new("empty quality range"),
            )
        })
}

fn encode_jpeg(img: &RgbImage, quality: u8) -> Result<Vec<u8>, FoodError> {
    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, quality)
        .encode_image(img)
        .map_err(|e| FoodError::encode_error(format!("JPEG encode at quality {quality}"), e))?;
    Ok(buffer)
}
