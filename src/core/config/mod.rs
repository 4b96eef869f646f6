//! Configuration for the classifier, the confidence gate, the nutrition
//! providers and the dataset re-encoder.
//!
//! All sections deserialize with defaults for missing fields, so a
//! configuration file only needs to name what it overrides:
//!
//! ```rust
//! use foodlens::core::config::FoodLensConfig;
//!
//! let config: FoodLensConfig = serde_json::from_str(r#"
//! {
//!   "model": { "model_path": "models/foodcf.onnx", "session_pool_size": 2 },
//!   "gate": { "confidence_threshold": 0.6 }
//! }
//! "#).unwrap();
//! assert_eq!(config.model.input_size, 224);
//! assert_eq!(config.reencode.target_size_kb, 300);
//! ```

pub mod errors;
pub mod onnx;

pub use errors::{ConfigError, ConfigValidator};
pub use onnx::{OrtGraphOptimizationLevel, OrtSessionConfig};

use crate::core::constants::{
    API_KEY_ENV_VAR, DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_GATED_SENTINEL, DEFAULT_INPUT_SIZE,
    DEFAULT_PRIMARY_URL, DEFAULT_PROVIDER_TIMEOUT_MS, DEFAULT_SEARCH_URL, DEFAULT_USER_AGENT,
};
use crate::core::inference::OutputActivation;
use crate::dataset::ReencodeOptions;
use crate::nutrition::MarkupProfile;
use crate::processors::ChannelOrder;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodLensConfig {
    /// Classifier model settings.
    pub model: ModelConfig,
    /// Confidence gate settings.
    pub gate: GateConfig,
    /// Primary nutrition provider (JSON API).
    pub primary: PrimaryProviderConfig,
    /// Fallback nutrition provider (web search scrape).
    pub fallback: FallbackProviderConfig,
    /// Dataset re-encoder defaults.
    pub reencode: ReencodeOptions,
}

impl FoodLensConfig {
    /// Loads configuration from a JSON file and applies environment overrides.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(config.with_env_overrides())
    }

    /// Fills the provider API key from the environment when the file left it unset.
    pub fn with_env_overrides(mut self) -> Self {
        if self.primary.api_key.is_none() {
            self.primary.api_key = std::env::var(API_KEY_ENV_VAR)
                .ok()
                .filter(|key| !key.trim().is_empty());
        }
        self
    }
}

impl ConfigValidator for FoodLensConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.model.validate()?;
        self.gate.validate()?;
        self.primary.validate()?;
        self.fallback.validate()?;
        self.reencode.validate()
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Classifier model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Path to the ONNX model.
    pub model_path: Option<PathBuf>,
    /// Display name used in logs and errors; defaults to the model file stem.
    pub model_name: Option<String>,
    /// Optional label file (one name per line); the embedded table is used otherwise.
    pub labels_path: Option<PathBuf>,
    /// Square input side in pixels.
    pub input_size: u32,
    /// Tensor layout expected by the model.
    pub channel_order: ChannelOrder,
    /// Whether the model output is already a probability distribution.
    pub activation: OutputActivation,
    /// Input tensor name; discovered from the model when unset.
    pub input_name: Option<String>,
    /// Output tensor name; discovered from the model when unset.
    pub output_name: Option<String>,
    /// Number of sessions in the pool.
    pub session_pool_size: usize,
    /// ONNX Runtime session options.
    pub ort_session: Option<OrtSessionConfig>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            model_name: None,
            labels_path: None,
            input_size: DEFAULT_INPUT_SIZE,
            channel_order: ChannelOrder::default(),
            activation: OutputActivation::default(),
            input_name: None,
            output_name: None,
            session_pool_size: 1,
            ort_session: None,
        }
    }
}

impl ConfigValidator for ModelConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_input_size(self.input_size)?;
        self.validate_positive(self.session_pool_size as u64, "model.session_pool_size")?;
        if let Some(path) = &self.model_path {
            self.validate_model_path(path)?;
        }
        if let Some(ort) = &self.ort_session {
            if let Some(threads) = ort.intra_threads {
                self.validate_thread_count(threads)?;
            }
            if let Some(threads) = ort.inter_threads {
                self.validate_thread_count(threads)?;
            }
        }
        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Confidence gate settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Minimum top-1 probability for a recognized category.
    pub confidence_threshold: f32,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }
}

impl ConfigValidator for GateConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_confidence_threshold(self.confidence_threshold)
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Primary nutrition provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PrimaryProviderConfig {
    /// Endpoint receiving `?query=<text>`.
    pub base_url: String,
    /// API key; falls back to the environment when unset.
    pub api_key: Option<String>,
    /// Header carrying the API key.
    pub api_key_header: String,
    /// Prefix of the string a field holds when access to it is gated.
    pub gated_sentinel: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for PrimaryProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_PRIMARY_URL.to_string(),
            api_key: None,
            api_key_header: "X-Api-Key".to_string(),
            gated_sentinel: DEFAULT_GATED_SENTINEL.to_string(),
            timeout_ms: DEFAULT_PROVIDER_TIMEOUT_MS,
        }
    }
}

impl ConfigValidator for PrimaryProviderConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_http_url(&self.base_url, "primary.base_url")?;
        if self.gated_sentinel.trim().is_empty() {
            return Err(ConfigError::InvalidConfig {
                message: "primary.gated_sentinel must not be empty".to_string(),
            });
        }
        self.validate_positive(self.timeout_ms, "primary.timeout_ms")
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Fallback nutrition provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackProviderConfig {
    /// When false, gated fields are left as reported by the primary provider.
    pub enabled: bool,
    /// Search endpoint receiving `?q=<text>`.
    pub base_url: String,
    /// User agent sent with search requests.
    pub user_agent: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Extraction patterns for the result page markup.
    pub markup: MarkupProfile,
}

impl Default for FallbackProviderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: DEFAULT_SEARCH_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_ms: DEFAULT_PROVIDER_TIMEOUT_MS,
            markup: MarkupProfile::default(),
        }
    }
}

impl ConfigValidator for FallbackProviderConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_http_url(&self.base_url, "fallback.base_url")?;
        self.validate_positive(self.timeout_ms, "fallback.timeout_ms")?;
        self.markup.validate()
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_are_valid() {
        let config = FoodLensConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.gate.confidence_threshold, 0.5);
        assert_eq!(config.model.input_size, 224);
        assert!(config.fallback.enabled);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "gate": {{ "confidence_threshold": 0.7 }}, "primary": {{ "api_key": "k" }} }}"#
        )
        .unwrap();

        let config = FoodLensConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.gate.confidence_threshold, 0.7);
        assert_eq!(config.primary.api_key.as_deref(), Some("k"));
        assert_eq!(config.primary.api_key_header, "X-Api-Key");
        assert_eq!(config.reencode.target_size_kb, 300);
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let mut config = FoodLensConfig::default();
        config.gate.confidence_threshold = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_model_path_rejected() {
        let mut config = FoodLensConfig::default();
        config.model.model_path = Some(PathBuf::from("/nonexistent/foodcf.onnx"));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ModelPathNotFound { .. })
        ));
    }

    #[test]
    fn test_non_http_url_rejected() {
        let mut config = FoodLensConfig::default();
        config.primary.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_file_reports_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(
            FoodLensConfig::from_json_file(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }
}
