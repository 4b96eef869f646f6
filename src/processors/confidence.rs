//! Confidence gate over classifier output.
//!
//! Picks the most probable category and accepts it only when its probability
//! reaches a fixed threshold and the category id has a name in the label
//! table.

use crate::core::constants::DEFAULT_CONFIDENCE_THRESHOLD;
use crate::core::{FoodError, LabelTable};
use crate::domain::{CategoryDistribution, ClassificationResult};
use tracing::debug;

/// Turns a distribution into a recognized category or `Unrecognized`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceGate {
    threshold: f32,
}

impl ConfidenceGate {
    /// Creates a gate with the given threshold.
    ///
    /// # Errors
    ///
    /// Returns `FoodError::InvalidInput` if the threshold is outside `[0, 1]`.
    pub fn new(threshold: f32) -> Result<Self, FoodError> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(FoodError::invalid_input(format!(
                "confidence threshold must be between 0.0 and 1.0, got {threshold}"
            )));
        }
        Ok(Self { threshold })
    }

    /// The acceptance threshold.
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Applies the gate.
    ///
    /// Ties on the top probability go to the lowest category id. A top id
    /// missing from `labels` is treated like a low-confidence result.
    pub fn apply(
        &self,
        distribution: &CategoryDistribution,
        labels: &LabelTable,
    ) -> ClassificationResult {
        let (best_id, best_p) = distribution.best();

        if best_p < self.threshold {
            debug!(
                category_id = best_id,
                confidence = best_p,
                threshold = self.threshold,
                "top category below confidence threshold"
            );
            return ClassificationResult::Unrecognized;
        }

        match labels.name(best_id) {
            Some(name) => ClassificationResult::Recognized {
                category_id: best_id,
                category: name.to_string(),
                confidence: best_p,
            },
            None => {
                debug!(category_id = best_id, "top category has no label");
                ClassificationResult::Unrecognized
            }
        }
    }
}

impl Default for ConfidenceGate {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> LabelTable {
        LabelTable::new(["apple", "banana", "carrot", "durian"]).unwrap()
    }

    /// Distribution with `peak` at `index` and the rest spread evenly.
    fn peaked(len: usize, index: usize, peak: f32) -> CategoryDistribution {
        let rest = (1.0 - peak) / (len - 1) as f32;
        let probs = (0..len)
            .map(|i| if i == index { peak } else { rest })
            .collect();
        CategoryDistribution::new(probs).unwrap()
    }

    #[test]
    fn test_below_threshold_is_unrecognized_at_every_index() {
        let gate = ConfidenceGate::default();
        for index in 0..4 {
            let dist = peaked(4, index, 0.49);
            assert_eq!(gate.apply(&dist, &labels()), ClassificationResult::Unrecognized);
        }
    }

    #[test]
    fn test_at_or_above_threshold_is_recognized() {
        let gate = ConfidenceGate::default();
        let dist = peaked(4, 2, 0.5);
        assert_eq!(
            gate.apply(&dist, &labels()),
            ClassificationResult::Recognized {
                category_id: 2,
                category: "carrot".to_string(),
                confidence: 0.5,
            }
        );

        let dist = peaked(4, 1, 0.92);
        assert_eq!(gate.apply(&dist, &labels()).category(), Some("banana"));
    }

    #[test]
    fn test_ties_resolve_to_lowest_id() {
        let gate = ConfidenceGate::new(0.3).unwrap();
        let dist = CategoryDistribution::new(vec![0.1, 0.45, 0.0, 0.45]).unwrap();
        assert_eq!(gate.apply(&dist, &labels()).category(), Some("banana"));
    }

    #[test]
    fn test_unknown_category_id_is_unrecognized() {
        let gate = ConfidenceGate::default();
        let dist = peaked(6, 5, 0.9);
        assert_eq!(gate.apply(&dist, &labels()), ClassificationResult::Unrecognized);
    }

    #[test]
    fn test_threshold_out_of_range_rejected() {
        assert!(ConfidenceGate::new(-0.1).is_err());
        assert!(ConfidenceGate::new(1.01).is_err());
        assert_eq!(ConfidenceGate::new(0.8).unwrap().threshold(), 0.8);
    }
}
