//! ONNX Runtime session settings for the classifier pool.

use serde::{Deserialize, Serialize};

/// How aggressively ONNX Runtime rewrites the model graph at load time.
///
/// Serialized in snake_case, e.g. `"optimization_level": "extended"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrtGraphOptimizationLevel {
    Disabled,
    /// Constant folding and redundant node removal.
    #[default]
    Basic,
    /// Adds node fusions.
    Extended,
    /// Adds layout transformations.
    All,
}

/// Options applied to every session in the classifier pool. Unset fields
/// keep the ONNX Runtime defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrtSessionConfig {
    /// Threads inside a single operator.
    pub intra_threads: Option<usize>,
    /// Threads across independent operators.
    pub inter_threads: Option<usize>,
    pub optimization_level: Option<OrtGraphOptimizationLevel>,
}

impl OrtSessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_intra_threads(self, threads: usize) -> Self {
        Self {
            intra_threads: Some(threads),
            ..self
        }
    }

    pub fn with_inter_threads(self, threads: usize) -> Self {
        Self {
            inter_threads: Some(threads),
            ..self
        }
    }

    pub fn with_optimization_level(self, level: OrtGraphOptimizationLevel) -> Self {
        Self {
            optimization_level: Some(level),
            ..self
        }
    }

    /// True when nothing would be changed on the session builder.
    pub fn is_runtime_default(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders_leave_other_fields_unset() {
        let config = OrtSessionConfig::new()
            .with_intra_threads(2)
            .with_optimization_level(OrtGraphOptimizationLevel::All);
        assert_eq!(config.intra_threads, Some(2));
        assert!(config.inter_threads.is_none());
        assert_eq!(
            config.optimization_level,
            Some(OrtGraphOptimizationLevel::All)
        );
        assert!(!config.is_runtime_default());
        assert!(OrtSessionConfig::new().is_runtime_default());
    }

    #[test]
    fn test_levels_parse_from_snake_case() {
        let config: OrtSessionConfig =
            serde_json::from_str(r#"{"optimization_level": "extended"}"#).unwrap();
        assert_eq!(
            config.optimization_level,
            Some(OrtGraphOptimizationLevel::Extended)
        );
        assert_eq!(
            OrtGraphOptimizationLevel::default(),
            OrtGraphOptimizationLevel::Basic
        );
    }
}
