//! Configuration error types and validation traits.

use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A model path does not exist.
    #[error("model path does not exist: {path}")]
    ModelPathNotFound { path: std::path::PathBuf },

    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// The configuration file could not be read.
    #[error("failed to read configuration file {path}")]
    Read {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for this schema.
    #[error("failed to parse configuration file {path}")]
    Parse {
        path: std::path::PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Validation shared by every configuration section.
///
/// Sections implement [`ConfigValidator::validate`] and
/// [`ConfigValidator::get_defaults`] and compose the provided checks.
pub trait ConfigValidator {
    /// Checks every field of the section.
    fn validate(&self) -> Result<(), ConfigError>;

    /// The section with all defaults applied.
    fn get_defaults() -> Self
    where
        Self: Sized;

    /// The model file must exist and be a regular file.
    fn validate_model_path(&self, path: &Path) -> Result<(), ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ModelPathNotFound {
                path: path.to_path_buf(),
            });
        }
        if !path.is_file() {
            return Err(invalid(format!(
                "model path {} is not a file",
                path.display()
            )));
        }
        Ok(())
    }

    /// The square classifier input side must be non-zero.
    fn validate_input_size(&self, size: u32) -> Result<(), ConfigError> {
        match size {
            0 => Err(invalid("model.input_size must be greater than 0")),
            _ => Ok(()),
        }
    }

    /// Probabilities live in `[0.0, 1.0]`.
    fn validate_confidence_threshold(&self, threshold: f32) -> Result<(), ConfigError> {
        if (0.0..=1.0).contains(&threshold) {
            Ok(())
        } else {
            Err(invalid(format!(
                "confidence threshold must be within [0.0, 1.0], got {threshold}"
            )))
        }
    }

    /// ONNX Runtime thread counts: at least one, at most 256.
    fn validate_thread_count(&self, threads: usize) -> Result<(), ConfigError> {
        const MAX_THREADS: usize = 256;
        match threads {
            0 => Err(invalid("ort thread count must be greater than 0")),
            n if n > MAX_THREADS => Err(invalid(format!(
                "ort thread count {n} is above the limit of {MAX_THREADS}"
            ))),
            _ => Ok(()),
        }
    }

    /// Counts, sizes and timeouts must be non-zero.
    fn validate_positive(&self, value: u64, field: &str) -> Result<(), ConfigError> {
        if value == 0 {
            Err(invalid(format!("{field} must be greater than 0")))
        } else {
            Ok(())
        }
    }

    /// Provider endpoints must be http(s) URLs.
    fn validate_http_url(&self, url: &str, field: &str) -> Result<(), ConfigError> {
        if url.starts_with("http://") || url.starts_with("https://") {
            Ok(())
        } else {
            Err(invalid(format!("{field} must be an http(s) URL, got '{url}'")))
        }
    }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidConfig {
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe;

    impl ConfigValidator for Probe {
        fn validate(&self) -> Result<(), ConfigError> {
            Ok(())
        }

        fn get_defaults() -> Self {
            Probe
        }
    }

    #[test]
    fn test_thread_count_bounds() {
        assert!(Probe.validate_thread_count(0).is_err());
        assert!(Probe.validate_thread_count(8).is_ok());
        assert!(Probe.validate_thread_count(257).is_err());
    }

    #[test]
    fn test_http_url() {
        assert!(Probe.validate_http_url("https://api.example.com/v1", "url").is_ok());
        assert!(Probe.validate_http_url("example.com", "url").is_err());
    }

    #[test]
    fn test_model_path_missing_and_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Probe.validate_model_path(&dir.path().join("absent.onnx")),
            Err(ConfigError::ModelPathNotFound { .. })
        ));
        assert!(matches!(
            Probe.validate_model_path(dir.path()),
            Err(ConfigError::InvalidConfig { .. })
        ));
    }
}
