//! Nutrition lookup for recognized categories.
//!
//! * [`resolver`] - the provider chain and its degradation policy
//! * [`ninjas`] - primary JSON API client
//! * [`web_search`] - fallback scraper and its markup profiles
//! * [`merge`] - per-field merge of fallback facts
//! * [`record`] - record and value types
//! * [`provider`] - provider traits and the response envelope

pub mod merge;
pub mod ninjas;
pub mod provider;
pub mod record;
pub mod resolver;
pub mod web_search;

pub use merge::{FallbackFacts, merge_fallback};
pub use ninjas::NinjasNutritionProvider;
pub use provider::{
    CalorieFacts, FallbackNutritionSource, FetchOutcome, PrimaryNutritionSource, ProviderError,
    ProviderId, ProviderResponse,
};
pub use record::{NutrientValue, NutritionRecord};
pub use resolver::NutritionResolver;
pub use web_search::{CompiledProfile, MarkupProfile, WebSearchScraper};
