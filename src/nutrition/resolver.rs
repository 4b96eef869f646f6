//! Ordered provider chain with graceful degradation.

use super::merge::{FallbackFacts, merge_fallback};
use super::ninjas::NinjasNutritionProvider;
use super::provider::{
    FallbackNutritionSource, FetchOutcome, PrimaryNutritionSource, ProviderResponse,
};
use super::record::NutritionRecord;
use super::web_search::WebSearchScraper;
use crate::core::FoodError;
use crate::core::config::FoodLensConfig;
use tracing::{debug, warn};

/// Resolves nutrition for a recognized category.
///
/// The primary source is asked first. When its record has gated fields and a
/// fallback is configured, the fallback is asked for calories and protein and
/// the results are merged with [`merge_fallback`]. Provider faults are logged
/// and degrade that provider's contribution; they are never returned.
pub struct NutritionResolver {
    primary: Box<dyn PrimaryNutritionSource>,
    fallback: Option<Box<dyn FallbackNutritionSource>>,
}

impl std::fmt::Debug for NutritionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NutritionResolver")
            .field("primary", &self.primary.id())
            .field("fallback", &self.fallback.as_ref().map(|f| f.id()))
            .finish()
    }
}

impl NutritionResolver {
    pub fn new(
        primary: Box<dyn PrimaryNutritionSource>,
        fallback: Option<Box<dyn FallbackNutritionSource>>,
    ) -> Self {
        Self { primary, fallback }
    }

    /// Builds the HTTP providers from configuration.
    pub fn from_config(config: &FoodLensConfig) -> Result<Self, FoodError> {
        let primary = NinjasNutritionProvider::from_config(&config.primary);
        let fallback: Option<Box<dyn FallbackNutritionSource>> = if config.fallback.enabled {
            Some(Box::new(WebSearchScraper::from_config(&config.fallback)?))
        } else {
            None
        };
        Ok(Self::new(Box::new(primary), fallback))
    }

    /// Returns the merged record, or `None` when the primary source has
    /// nothing for `category`.
    pub fn resolve(&self, category: &str) -> Result<Option<NutritionRecord>, FoodError> {
        let category = category.trim();
        if category.is_empty() {
            return Err(FoodError::invalid_input("category name must not be empty"));
        }

        let Some(record) = take(self.primary.fetch(category), category, "record") else {
            return Ok(None);
        };

        let Some(fallback) = self.fallback.as_ref().filter(|_| record.has_gated()) else {
            return Ok(Some(record));
        };

        debug!(
            category,
            gated = ?record.gated_fields().collect::<Vec<_>>(),
            "backfilling gated fields"
        );
        let mut facts = FallbackFacts::default();
        if let Some(calories) = take(fallback.lookup_calories(category), category, "calories") {
            facts.calories = Some(calories.calories);
            facts.serving_size_g = calories.serving_size_g;
        }
        facts.protein_g = take(fallback.lookup_protein(category), category, "protein");

        Ok(Some(merge_fallback(record, &facts)))
    }
}

fn take<T>(response: ProviderResponse<T>, category: &str, what: &str) -> Option<T> {
    match response.outcome {
        FetchOutcome::Success(value) => Some(value),
        FetchOutcome::Empty => {
            debug!(provider = %response.provider, category, what, "provider had no data");
            None
        }
        FetchOutcome::Error(error) => {
            warn!(
                provider = %response.provider,
                category,
                what,
                error = %error,
                "provider lookup failed"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::provider::{CalorieFacts, ProviderError, ProviderId};
    use crate::nutrition::record::{CALORIES, NutrientValue, PROTEIN_G, SERVING_SIZE_G};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const SENTINEL: &str = "Only available for premium subscribers.";

    enum PrimaryReply {
        Record(NutritionRecord),
        Empty,
        Fault,
    }

    struct StubPrimary {
        reply: PrimaryReply,
    }

    impl PrimaryNutritionSource for StubPrimary {
        fn id(&self) -> ProviderId {
            ProviderId::NutritionApi
        }

        fn fetch(&self, _category: &str) -> ProviderResponse<NutritionRecord> {
            match &self.reply {
                PrimaryReply::Record(r) => ProviderResponse::success(self.id(), r.clone()),
                PrimaryReply::Empty => ProviderResponse::empty(self.id()),
                PrimaryReply::Fault => ProviderResponse::error(
                    self.id(),
                    ProviderError::Status {
                        status: 401,
                        body: "invalid key".into(),
                    },
                ),
            }
        }
    }

    #[derive(Default)]
    struct StubFallback {
        calls: Arc<AtomicUsize>,
        calories: Option<CalorieFacts>,
        protein: Option<String>,
        fail: bool,
    }

    impl FallbackNutritionSource for StubFallback {
        fn id(&self) -> ProviderId {
            ProviderId::WebSearch
        }

        fn lookup_calories(&self, _category: &str) -> ProviderResponse<CalorieFacts> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return ProviderResponse::error(
                    self.id(),
                    ProviderError::Transport("timed out".into()),
                );
            }
            ProviderResponse::from_result(self.id(), Ok(self.calories.clone()))
        }

        fn lookup_protein(&self, _category: &str) -> ProviderResponse<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return ProviderResponse::error(
                    self.id(),
                    ProviderError::Markup {
                        profile: "stub@v1".into(),
                        message: "no protein".into(),
                    },
                );
            }
            ProviderResponse::from_result(self.id(), Ok(self.protein.clone()))
        }
    }

    fn gated_record() -> NutritionRecord {
        let mut record = NutritionRecord::new();
        record.insert(CALORIES, NutrientValue::Text("X".into()));
        record.insert(SERVING_SIZE_G, NutrientValue::Gated(SENTINEL.into()));
        record.insert(PROTEIN_G, NutrientValue::Gated(SENTINEL.into()));
        record
    }

    fn resolver(reply: PrimaryReply, fallback: StubFallback) -> NutritionResolver {
        NutritionResolver::new(
            Box::new(StubPrimary { reply }),
            Some(Box::new(fallback)),
        )
    }

    #[test]
    fn test_gated_fields_backfilled() {
        let calls = Arc::new(AtomicUsize::new(0));
        let fallback = StubFallback {
            calls: calls.clone(),
            calories: Some(CalorieFacts {
                calories: "89 kcal".into(),
                serving_size_g: Some(100.0),
            }),
            protein: Some("5g".into()),
            fail: false,
        };
        let record = resolver(PrimaryReply::Record(gated_record()), fallback)
            .resolve("banana")
            .unwrap()
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(record.get(CALORIES), Some(&NutrientValue::Text("X".into())));
        assert_eq!(record.get(SERVING_SIZE_G), Some(&NutrientValue::Number(100.0)));
        assert_eq!(record.get(PROTEIN_G), Some(&NutrientValue::Text("5g".into())));
    }

    #[test]
    fn test_primary_empty_skips_fallback() {
        let calls = Arc::new(AtomicUsize::new(0));
        let fallback = StubFallback {
            calls: calls.clone(),
            ..StubFallback::default()
        };
        let result = resolver(PrimaryReply::Empty, fallback).resolve("banana").unwrap();
        assert!(result.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_primary_fault_is_not_found() {
        let calls = Arc::new(AtomicUsize::new(0));
        let fallback = StubFallback {
            calls: calls.clone(),
            ..StubFallback::default()
        };
        let result = resolver(PrimaryReply::Fault, fallback).resolve("banana").unwrap();
        assert!(result.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_ungated_record_skips_fallback() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut record = NutritionRecord::new();
        record.insert(CALORIES, NutrientValue::Number(89.0));
        record.insert(PROTEIN_G, NutrientValue::Number(1.1));
        let fallback = StubFallback {
            calls: calls.clone(),
            ..StubFallback::default()
        };

        let resolved = resolver(PrimaryReply::Record(record.clone()), fallback)
            .resolve("banana")
            .unwrap();
        assert_eq!(resolved, Some(record));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_fallback_fault_keeps_primary_record() {
        let calls = Arc::new(AtomicUsize::new(0));
        let fallback = StubFallback {
            calls: calls.clone(),
            fail: true,
            ..StubFallback::default()
        };
        let resolved = resolver(PrimaryReply::Record(gated_record()), fallback)
            .resolve("banana")
            .unwrap();
        assert_eq!(resolved, Some(gated_record()));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_disabled_fallback_returns_gated_record() {
        let resolver = NutritionResolver::new(
            Box::new(StubPrimary {
                reply: PrimaryReply::Record(gated_record()),
            }),
            None,
        );
        assert_eq!(resolver.resolve("banana").unwrap(), Some(gated_record()));
    }

    #[test]
    fn test_empty_category_is_contract_violation() {
        let result = resolver(PrimaryReply::Empty, StubFallback::default()).resolve("  ");
        assert!(matches!(result, Err(FoodError::InvalidInput { .. })));
    }
}
