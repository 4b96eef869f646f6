//! Primary provider: JSON nutrition API.

use super::provider::{PrimaryNutritionSource, ProviderError, ProviderId, ProviderResponse};
use super::record::NutritionRecord;
use crate::core::config::PrimaryProviderConfig;
use std::time::Duration;
use tracing::{debug, warn};

/// Client for an API that answers `GET <base_url>?query=<text>` with a JSON
/// array of nutrition objects.
pub struct NinjasNutritionProvider {
    agent: ureq::Agent,
    base_url: String,
    api_key: Option<String>,
    api_key_header: String,
    gated_sentinel: String,
}

impl std::fmt::Debug for NinjasNutritionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NinjasNutritionProvider")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_key_header", &self.api_key_header)
            .finish()
    }
}

impl NinjasNutritionProvider {
    pub fn from_config(config: &PrimaryProviderConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build();
        if config.api_key.is_none() {
            warn!("no API key configured for the nutrition API; requests will likely be rejected");
        }
        Self {
            agent,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            api_key_header: config.api_key_header.clone(),
            gated_sentinel: config.gated_sentinel.clone(),
        }
    }

    /// Query text sent for a category.
    pub fn query_for(category: &str) -> String {
        format!("{category} calories")
    }

    fn request(&self, query: &str) -> Result<Option<NutritionRecord>, ProviderError> {
        let mut request = self.agent.get(&self.base_url).query("query", query);
        if let Some(key) = &self.api_key {
            request = request.set(&self.api_key_header, key);
        }
        let response = request.call()?;
        let body: serde_json::Value = response
            .into_json()
            .map_err(|e| ProviderError::Parse(e.to_string()))?;
        parse_body(&body, &self.gated_sentinel)
    }
}

impl PrimaryNutritionSource for NinjasNutritionProvider {
    fn id(&self) -> ProviderId {
        ProviderId::NutritionApi
    }

    fn fetch(&self, category: &str) -> ProviderResponse<NutritionRecord> {
        let query = Self::query_for(category);
        debug!(provider = %self.id(), %query, "querying nutrition API");
        ProviderResponse::from_result(self.id(), self.request(&query))
    }
}

/// Takes the first element of the response array as the record.
pub(crate) fn parse_body(
    body: &serde_json::Value,
    gated_sentinel: &str,
) -> Result<Option<NutritionRecord>, ProviderError> {
    let items = body
        .as_array()
        .ok_or_else(|| ProviderError::Parse("expected a JSON array".to_string()))?;
    match items.first() {
        None => Ok(None),
        Some(serde_json::Value::Object(object)) => {
            let record = NutritionRecord::from_json_object(object, gated_sentinel);
            Ok((!record.is_empty()).then_some(record))
        }
        Some(other) => Err(ProviderError::Parse(format!(
            "expected an object in the array, got {other}"
        ))),
    }
}
