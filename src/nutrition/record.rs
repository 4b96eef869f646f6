//! Nutrition record types.

use serde::Serialize;
use std::collections::BTreeMap;

/// Field holding the energy content.
pub const CALORIES: &str = "calories";
/// Field holding the serving basis in grams.
pub const SERVING_SIZE_G: &str = "serving_size_g";
/// Field holding the protein content.
pub const PROTEIN_G: &str = "protein_g";

/// One nutrient value as reported by a provider.
///
/// Serializes untagged, so a record renders as a flat JSON object and gated
/// fields keep the provider's sentinel text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NutrientValue {
    Number(f64),
    Text(String),
    /// The provider withheld this field behind a paid plan.
    Gated(String),
}

impl NutrientValue {
    pub fn is_gated(&self) -> bool {
        matches!(self, NutrientValue::Gated(_))
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            NutrientValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            NutrientValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Nutrient fields by name, in stable key order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NutritionRecord {
    fields: BTreeMap<String, NutrientValue>,
}

impl NutritionRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a record from one JSON object returned by a provider.
    ///
    /// Strings starting with `gated_sentinel` become [`NutrientValue::Gated`].
    /// Nulls are dropped; nested values are kept as their JSON text.
    pub fn from_json_object(
        object: &serde_json::Map<String, serde_json::Value>,
        gated_sentinel: &str,
    ) -> Self {
        use serde_json::Value;

        let mut record = Self::new();
        for (name, value) in object {
            let value = match value {
                Value::Null => continue,
                Value::Number(n) => match n.as_f64() {
                    Some(n) => NutrientValue::Number(n),
                    None => NutrientValue::Text(n.to_string()),
                },
                Value::String(s) if s.trim_start().starts_with(gated_sentinel) => {
                    NutrientValue::Gated(s.clone())
                }
                Value::String(s) => NutrientValue::Text(s.clone()),
                other => NutrientValue::Text(other.to_string()),
            };
            record.insert(name.clone(), value);
        }
        record
    }

    pub fn insert(&mut self, field: impl Into<String>, value: NutrientValue) -> Option<NutrientValue> {
        self.fields.insert(field.into(), value)
    }

    pub fn get(&self, field: &str) -> Option<&NutrientValue> {
        self.fields.get(field)
    }

    /// Whether the named field is present and gated.
    pub fn is_gated(&self, field: &str) -> bool {
        self.get(field).is_some_and(NutrientValue::is_gated)
    }

    /// Whether any field is gated.
    pub fn has_gated(&self) -> bool {
        self.fields.values().any(NutrientValue::is_gated)
    }

    pub fn gated_fields(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|(_, v)| v.is_gated())
            .map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &NutrientValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
