//! Constants used throughout the pipeline.
//!
//! Defaults for the classifier input, the confidence gate, the nutrition
//! providers and the dataset re-encoder live here so configuration defaults and
//! tests agree on one value.

/// Side length of the square classifier input.
pub const DEFAULT_INPUT_SIZE: u32 = 224;

/// Number of color channels in the classifier input.
pub const INPUT_CHANNELS: usize = 3;

/// Minimum top-1 probability for a category to count as recognized.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.5;

/// Allowed deviation of a distribution's sum from 1.0.
pub const DISTRIBUTION_TOLERANCE: f32 = 1e-3;

/// Default byte budget, in kilobytes, for re-encoded training images.
pub const DEFAULT_TARGET_SIZE_KB: u64 = 300;

/// JPEG quality of the first encoding attempt.
pub const JPEG_START_QUALITY: u8 = 100;

/// Quality decrement between encoding attempts.
pub const JPEG_QUALITY_STEP: u8 = 5;

/// Lowest JPEG quality the re-encoder will try.
pub const JPEG_MIN_QUALITY: u8 = 10;

/// Default endpoint of the primary nutrition provider.
pub const DEFAULT_PRIMARY_URL: &str = "https://api.api-ninjas.com/v1/nutrition";

/// Default search endpoint scraped by the fallback provider.
pub const DEFAULT_SEARCH_URL: &str = "https://www.google.com/search";

/// Text the primary provider puts in fields that need a paid plan.
pub const DEFAULT_GATED_SENTINEL: &str = "Only available for premium subscribers";

/// Default request timeout for both nutrition providers.
pub const DEFAULT_PROVIDER_TIMEOUT_MS: u64 = 10_000;

/// User agent sent to the search endpoint.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Environment variable holding the primary provider API key.
pub const API_KEY_ENV_VAR: &str = "FOODLENS_NUTRITION_API_KEY";
