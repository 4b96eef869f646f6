//! Classifier adapter over ONNX Runtime.
//!
//! [`FoodClassifier`] is the seam the pipeline depends on; [`OrtClassifier`]
//! implements it with a pool of ONNX Runtime sessions. Tests and alternative
//! backends implement the trait directly.

pub mod ort_infer;
pub mod session;

pub use ort_infer::OrtClassifier;
pub use session::{build_session, load_session};

use crate::core::FoodError;
use crate::domain::{CategoryDistribution, NormalizedTensor};
use serde::{Deserialize, Serialize};

/// Produces a probability distribution over categories for one image.
///
/// Implementations run a single forward pass per call, without retries.
/// Any failure is fatal to the request that triggered it.
pub trait FoodClassifier: Send + Sync {
    /// Name used in logs and error messages.
    fn name(&self) -> &str;

    /// Classifies one normalized image.
    fn classify(&self, tensor: &NormalizedTensor) -> Result<CategoryDistribution, FoodError>;
}

/// How raw model output maps to probabilities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputActivation {
    /// The model already ends in softmax.
    #[default]
    Probabilities,
    /// The model emits logits; softmax is applied here.
    Softmax,
}

impl OutputActivation {
    /// Converts one row of model output into a distribution.
    pub fn to_distribution(&self, scores: &[f32]) -> Result<CategoryDistribution, FoodError> {
        match self {
            OutputActivation::Probabilities => CategoryDistribution::new(scores.to_vec()),
            OutputActivation::Softmax => CategoryDistribution::from_logits(scores),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probabilities_passthrough() {
        let dist = OutputActivation::Probabilities
            .to_distribution(&[0.25, 0.75])
            .unwrap();
        assert_eq!(dist.best(), (1, 0.75));
    }

    #[test]
    fn test_probabilities_rejects_logits() {
        assert!(OutputActivation::Probabilities
            .to_distribution(&[3.0, -1.0])
            .is_err());
    }

    #[test]
    fn test_softmax_accepts_logits() {
        let dist = OutputActivation::Softmax.to_distribution(&[3.0, -1.0]).unwrap();
        assert_eq!(dist.best().0, 0);
    }
}
