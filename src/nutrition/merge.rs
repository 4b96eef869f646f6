//! Per-field merge of fallback facts into a primary record.

use super::record::{NutrientValue, NutritionRecord, PROTEIN_G, SERVING_SIZE_G};

/// What the fallback provider yielded for one category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FallbackFacts {
    pub calories: Option<String>,
    pub serving_size_g: Option<f64>,
    pub protein_g: Option<String>,
}

impl FallbackFacts {
    pub fn is_empty(&self) -> bool {
        self.calories.is_none() && self.serving_size_g.is_none() && self.protein_g.is_none()
    }
}

/// Replaces gated `serving_size_g` and `protein_g` with fallback values.
///
/// Fields that are not gated are never touched, and `calories` is never
/// taken from the fallback even when it is gated.
pub fn merge_fallback(mut record: NutritionRecord, facts: &FallbackFacts) -> NutritionRecord {
    if record.is_gated(SERVING_SIZE_G) {
        if let Some(grams) = facts.serving_size_g {
            record.insert(SERVING_SIZE_G, NutrientValue::Number(grams));
        }
    }
    if record.is_gated(PROTEIN_G) {
        if let Some(protein) = &facts.protein_g {
            record.insert(PROTEIN_G, NutrientValue::Text(protein.clone()));
        }
    }
    record
}
