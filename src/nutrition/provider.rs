//! Provider seams and the uniform response envelope.

use super::record::NutritionRecord;
use std::fmt;
use thiserror::Error;

/// Identifies a nutrition provider in logs and responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    /// JSON nutrition API, queried first.
    NutritionApi,
    /// Web search result scrape, used to backfill gated fields.
    WebSearch,
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderId::NutritionApi => f.write_str("nutrition_api"),
            ProviderId::WebSearch => f.write_str("web_search"),
        }
    }
}

/// Faults a provider can report. These never leave the nutrition module.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The provider answered with a non-success status.
    #[error("provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The request did not complete.
    #[error("transport error: {0}")]
    Transport(String),

    /// The body could not be read or had an unexpected shape.
    #[error("unexpected response body: {0}")]
    Parse(String),

    /// The page markup did not match the active profile.
    #[error("markup profile '{profile}' did not match: {message}")]
    Markup { profile: String, message: String },
}

impl From<ureq::Error> for ProviderError {
    fn from(error: ureq::Error) -> Self {
        match error {
            ureq::Error::Status(status, response) => {
                let body = response
                    .into_string()
                    .map(|s| s.chars().take(200).collect())
                    .unwrap_or_default();
                ProviderError::Status { status, body }
            }
            ureq::Error::Transport(transport) => ProviderError::Transport(transport.to_string()),
        }
    }
}

/// Result of one provider call.
#[derive(Debug)]
pub enum FetchOutcome<T> {
    Success(T),
    /// The provider answered but had nothing for the query.
    Empty,
    Error(ProviderError),
}

/// A provider's answer, tagged with the provider that produced it.
#[derive(Debug)]
pub struct ProviderResponse<T> {
    pub provider: ProviderId,
    pub outcome: FetchOutcome<T>,
}

impl<T> ProviderResponse<T> {
    pub fn success(provider: ProviderId, value: T) -> Self {
        Self {
            provider,
            outcome: FetchOutcome::Success(value),
        }
    }

    pub fn empty(provider: ProviderId) -> Self {
        Self {
            provider,
            outcome: FetchOutcome::Empty,
        }
    }

    pub fn error(provider: ProviderId, error: ProviderError) -> Self {
        Self {
            provider,
            outcome: FetchOutcome::Error(error),
        }
    }

    /// Wraps a fallible fetch, mapping `Ok(None)` to [`FetchOutcome::Empty`].
    pub fn from_result(provider: ProviderId, result: Result<Option<T>, ProviderError>) -> Self {
        match result {
            Ok(Some(value)) => Self::success(provider, value),
            Ok(None) => Self::empty(provider),
            Err(error) => Self::error(provider, error),
        }
    }
}

/// Calorie lookup result from the fallback provider.
#[derive(Debug, Clone, PartialEq)]
pub struct CalorieFacts {
    /// Energy as displayed, e.g. `"89 kcal"`.
    pub calories: String,
    /// Serving basis the calories refer to, in grams.
    pub serving_size_g: Option<f64>,
}

/// The primary source: returns a full record for a category.
pub trait PrimaryNutritionSource: Send + Sync {
    fn id(&self) -> ProviderId;

    /// Looks up nutrition for a category name.
    fn fetch(&self, category: &str) -> ProviderResponse<NutritionRecord>;
}

/// The fallback source: two independent single-fact lookups.
pub trait FallbackNutritionSource: Send + Sync {
    fn id(&self) -> ProviderId;

    /// Calories and the serving basis for a category.
    fn lookup_calories(&self, category: &str) -> ProviderResponse<CalorieFacts>;

    /// Protein content for a category, as displayed.
    fn lookup_protein(&self, category: &str) -> ProviderResponse<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_result_maps_outcomes() {
        let ok = ProviderResponse::from_result(ProviderId::WebSearch, Ok(Some(1)));
        assert!(matches!(ok.outcome, FetchOutcome::Success(1)));

        let empty = ProviderResponse::<i32>::from_result(ProviderId::WebSearch, Ok(None));
        assert!(matches!(empty.outcome, FetchOutcome::Empty));

        let failed = ProviderResponse::<i32>::from_result(
            ProviderId::NutritionApi,
            Err(ProviderError::Transport("connection refused".into())),
        );
        assert_eq!(failed.provider, ProviderId::NutritionApi);
        assert!(matches!(failed.outcome, FetchOutcome::Error(ProviderError::Transport(_))));
    }

    #[test]
    fn test_provider_id_display() {
        assert_eq!(ProviderId::NutritionApi.to_string(), "nutrition_api");
        assert_eq!(ProviderId::WebSearch.to_string(), "web_search");
    }
}
