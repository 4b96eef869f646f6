//! Classifier output and the gated classification result.

use crate::core::FoodError;
use crate::core::constants::DISTRIBUTION_TOLERANCE;
use crate::core::errors::SimpleError;
use serde::Serialize;

/// Probability distribution over categories, one entry per model output.
///
/// Entries are ordered by category id. Construction guarantees the values are
/// finite, non-negative and sum to 1 within [`DISTRIBUTION_TOLERANCE`].
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryDistribution {
    probabilities: Vec<f32>,
}

impl CategoryDistribution {
    /// Validates and wraps probabilities indexed by category id.
    ///
    /// # Errors
    ///
    /// Returns `FoodError::Processing` (post-processing stage) for an empty
    /// vector, a negative or non-finite value, or a sum away from 1.
    pub fn new(probabilities: Vec<f32>) -> Result<Self, FoodError> {
        if probabilities.is_empty() {
            return Err(invalid("distribution has no categories".to_string()));
        }
        if let Some((id, p)) = probabilities
            .iter()
            .enumerate()
            .find(|(_, p)| !p.is_finite() || **p < 0.0)
        {
            return Err(invalid(format!("probability {p} for category {id} is invalid")));
        }
        let sum: f32 = probabilities.iter().sum();
        if (sum - 1.0).abs() > DISTRIBUTION_TOLERANCE {
            return Err(invalid(format!("probabilities sum to {sum}, expected 1")));
        }
        Ok(Self { probabilities })
    }

    /// Applies a numerically stable softmax to raw scores.
    pub fn from_logits(logits: &[f32]) -> Result<Self, FoodError> {
        let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let exps: Vec<f32> = logits.iter().map(|l| (l - max).exp()).collect();
        let total: f32 = exps.iter().sum();
        Self::new(exps.into_iter().map(|e| e / total).collect())
    }

    /// Probability of one category.
    pub fn probability(&self, id: usize) -> Option<f32> {
        self.probabilities.get(id).copied()
    }

    /// Entry with the highest probability; ties resolve to the lowest id.
    pub fn best(&self) -> (usize, f32) {
        let mut best = (0, self.probabilities[0]);
        for (id, &p) in self.probabilities.iter().enumerate().skip(1) {
            if p > best.1 {
                best = (id, p);
            }
        }
        best
    }

    /// `(category_id, probability)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.probabilities.iter().copied().enumerate()
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    /// Always false; a distribution has at least one category.
    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }
}

fn invalid(context: String) -> FoodError {
    FoodError::processing(
        crate::core::ProcessingStage::PostProcessing,
        context,
        SimpleError::new("invalid category distribution"),
    )
}

/// Result of applying the confidence gate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ClassificationResult {
    /// The top category passed the threshold and has a known name.
    Recognized {
        category_id: usize,
        category: String,
        confidence: f32,
    },
    /// Confidence too low, or the top id has no name.
    Unrecognized,
}

impl ClassificationResult {
    /// Category name when recognized.
    pub fn category(&self) -> Option<&str> {
        match self {
            ClassificationResult::Recognized { category, .. } => Some(category),
            ClassificationResult::Unrecognized => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_distribution() {
        let dist = CategoryDistribution::new(vec![0.1, 0.7, 0.2]).unwrap();
        assert_eq!(dist.len(), 3);
        assert_eq!(dist.best(), (1, 0.7));
        assert_eq!(dist.probability(2), Some(0.2));
        assert_eq!(dist.probability(3), None);
    }

    #[test]
    fn test_best_prefers_lowest_id_on_tie() {
        let dist = CategoryDistribution::new(vec![0.1, 0.45, 0.45]).unwrap();
        assert_eq!(dist.best().0, 1);
    }

    #[test]
    fn test_rejects_invalid_distributions() {
        assert!(CategoryDistribution::new(vec![]).is_err());
        assert!(CategoryDistribution::new(vec![0.5, 0.6]).is_err());
        assert!(CategoryDistribution::new(vec![1.2, -0.2]).is_err());
        assert!(CategoryDistribution::new(vec![f32::NAN, 1.0]).is_err());
    }

    #[test]
    fn test_from_logits_sums_to_one() {
        let dist = CategoryDistribution::from_logits(&[2.0, 1.0, 0.1]).unwrap();
        let sum: f32 = dist.iter().map(|(_, p)| p).sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert_eq!(dist.best().0, 0);
    }
}
