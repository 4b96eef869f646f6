//! Fallback provider: facts scraped from a web search result page.
//!
//! The page is reduced to plain text and searched with the regexes of the
//! active [`MarkupProfile`]. The profile is configuration, so a change in the
//! upstream markup is handled by shipping a new profile rather than code.

use super::provider::{
    CalorieFacts, FallbackNutritionSource, ProviderError, ProviderId, ProviderResponse,
};
use crate::core::config::{ConfigError, FallbackProviderConfig};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

static TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<script.*?</script>|<style.*?</style>|<[^>]*>")
        .unwrap_or_else(|e| panic!("Failed to compile regex pattern: {e}"))
});
static SPACE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+").unwrap_or_else(|e| panic!("Failed to compile regex pattern: {e}"))
});

/// Named, versioned set of extraction patterns.
///
/// Each pattern must have a capture group; group 1 is the extracted value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkupProfile {
    pub name: String,
    pub version: u32,
    /// Captures the displayed energy, e.g. `89 kcal`.
    pub calories_pattern: String,
    /// Captures the serving basis in grams, e.g. `100` from `per 100 g`.
    pub serving_pattern: String,
    /// Captures the displayed protein, e.g. `1.1 g`.
    pub protein_pattern: String,
}

impl Default for MarkupProfile {
    fn default() -> Self {
        Self {
            name: "search-nutrition-panel".to_string(),
            version: 1,
            calories_pattern: r"(?i)(\d+(?:\.\d+)?\s*(?:kcal|calories|cal))\b".to_string(),
            serving_pattern: r"(?i)(?:per|amount per)\s+(\d+(?:\.\d+)?)\s*(?:g|grams?)\b"
                .to_string(),
            protein_pattern: r"(?i)protein\D{0,40}?(\d+(?:\.\d+)?\s*g)\b".to_string(),
        }
    }
}

impl MarkupProfile {
    /// Compiles the patterns.
    pub fn compile(&self) -> Result<CompiledProfile, ConfigError> {
        Ok(CompiledProfile {
            label: format!("{}@v{}", self.name, self.version),
            calories: self.compile_one("calories_pattern", &self.calories_pattern)?,
            serving: self.compile_one("serving_pattern", &self.serving_pattern)?,
            protein: self.compile_one("protein_pattern", &self.protein_pattern)?,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::InvalidConfig {
                message: "fallback.markup.name must not be empty".to_string(),
            });
        }
        self.compile().map(|_| ())
    }

    fn compile_one(&self, field: &str, pattern: &str) -> Result<Regex, ConfigError> {
        let regex = Regex::new(pattern).map_err(|e| ConfigError::InvalidConfig {
            message: format!("fallback.markup.{field} is not a valid regex: {e}"),
        })?;
        if regex.captures_len() < 2 {
            return Err(ConfigError::InvalidConfig {
                message: format!("fallback.markup.{field} needs a capture group"),
            });
        }
        Ok(regex)
    }
}

/// A [`MarkupProfile`] with its patterns compiled.
#[derive(Debug, Clone)]
pub struct CompiledProfile {
    label: String,
    calories: Regex,
    serving: Regex,
    protein: Regex,
}

impl CompiledProfile {
    /// `name@vN`, used in logs and errors.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Extracts calories and the serving basis from a result page.
    pub fn calorie_facts(&self, html: &str) -> Option<CalorieFacts> {
        let text = page_text(html);
        let calories = first_capture(&self.calories, &text)?;
        let serving_size_g = first_capture(&self.serving, &text).and_then(|s| s.parse().ok());
        Some(CalorieFacts {
            calories,
            serving_size_g,
        })
    }

    /// Extracts the protein amount from a result page.
    pub fn protein(&self, html: &str) -> Option<String> {
        first_capture(&self.protein, &page_text(html))
    }
}

fn page_text(html: &str) -> String {
    let stripped = TAG_RE.replace_all(html, " ");
    let decoded = stripped
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&#160;", " ");
    SPACE_RE.replace_all(&decoded, " ").trim().to_string()
}

fn first_capture(regex: &Regex, text: &str) -> Option<String> {
    regex
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Scrapes an unauthenticated search endpoint: `GET <base_url>?q=<text>`.
#[derive(Debug)]
pub struct WebSearchScraper {
    agent: ureq::Agent,
    base_url: String,
    profile: CompiledProfile,
}

impl WebSearchScraper {
    /// Builds the scraper; invalid patterns are a configuration error.
    pub fn from_config(config: &FallbackProviderConfig) -> Result<Self, ConfigError> {
        let profile = config.markup.compile()?;
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(&config.user_agent)
            .build();
        Ok(Self {
            agent,
            base_url: config.base_url.clone(),
            profile,
        })
    }

    pub fn profile(&self) -> &CompiledProfile {
        &self.profile
    }

    fn search(&self, query: &str) -> Result<String, ProviderError> {
        debug!(provider = %ProviderId::WebSearch, %query, profile = self.profile.label(), "searching");
        let response = self
            .agent
            .get(&self.base_url)
            .query("q", query)
            .query("hl", "en")
            .call()?;
        response
            .into_string()
            .map_err(|e| ProviderError::Parse(e.to_string()))
    }

    fn no_match(&self, what: &str) -> ProviderError {
        ProviderError::Markup {
            profile: self.profile.label().to_string(),
            message: format!("no {what} found on the result page"),
        }
    }
}

impl FallbackNutritionSource for WebSearchScraper {
    fn id(&self) -> ProviderId {
        ProviderId::WebSearch
    }

    fn lookup_calories(&self, category: &str) -> ProviderResponse<CalorieFacts> {
        let result = self
            .search(&format!("{category} calories"))
            .and_then(|html| {
                self.profile
                    .calorie_facts(&html)
                    .map(Some)
                    .ok_or_else(|| self.no_match("calories"))
            });
        ProviderResponse::from_result(self.id(), result)
    }

    fn lookup_protein(&self, category: &str) -> ProviderResponse<String> {
        let result = self
            .search(&format!("{category} protein"))
            .and_then(|html| {
                self.profile
                    .protein(&html)
                    .map(Some)
                    .ok_or_else(|| self.no_match("protein"))
            });
        ProviderResponse::from_result(self.id(), result)
    }
}
