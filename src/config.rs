//! Application settings
//!
//! Settings are read from environment variables with sensible defaults.
//! The additive reference lists here are configuration data for loaders and
//! binaries; the scoring engine only ever sees them through product data.

use std::time::Duration;

use crate::scoring::AdditiveSets;

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_AI_TIMEOUT_SECS: u64 = 120;

/// Levels accepted for `WECARE_LOG_LEVEL`
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// Common dietary preferences
pub const COMMON_DIETS: &[&str] = &[
    "Vegetarian",
    "Vegan",
    "Gluten-Free",
    "Keto",
    "Low-Sugar",
    "Low-Carb",
    "Low-Fat",
    "Low-Sodium",
    "Lactose-Free",
    "Pescatarian",
    "Paleo",
];

/// Common food allergens
pub const COMMON_ALLERGENS: &[&str] = &[
    "Peanuts",
    "Tree Nuts",
    "Milk",
    "Eggs",
    "Wheat",
    "Soy",
    "Fish",
    "Shellfish",
    "Sesame",
    "Mustard",
    "Celery",
    "Lupin",
    "Sulfites",
    "Mollusks",
];

/// Additives generally recognized as safe
pub const SAFE_ADDITIVES: &[&str] = &[
    "E100", "E101", "E300", "E304", "E306", "E307", "E308", "E309", "E322", "E330", "E331",
    "E332", "E333", "E334",
];

/// Additives with contested safety
pub const SUSPICIOUS_ADDITIVES: &[&str] = &[
    "E102", "E104", "E110", "E122", "E124", "E129", "E621", "E920", "E954",
];

/// Additives with documented health concerns
pub const HARMFUL_ADDITIVES: &[&str] = &["E211", "E249", "E250", "E251", "E252"];

/// The default additive reference lists as scoring sets
pub fn default_additive_sets() -> AdditiveSets {
    AdditiveSets::new(
        SAFE_ADDITIVES.iter().copied(),
        SUSPICIOUS_ADDITIVES.iter().copied(),
        HARMFUL_ADDITIVES.iter().copied(),
    )
}

/// Runtime settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    /// When false, the AI collaborator is never asked for a score
    pub scoring_enabled: bool,
    pub log_level: String,
    pub ai_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            scoring_enabled: true,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            ai_timeout: Duration::from_secs(DEFAULT_AI_TIMEOUT_SECS),
        }
    }
}

impl Settings {
    /// Load settings from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            api_key: lookup("OPENAI_API_KEY").unwrap_or_default(),
            model: non_empty("OPENAI_MODEL").unwrap_or(defaults.model),
            base_url: non_empty("LLM_API_BASE_URL").unwrap_or(defaults.base_url),
            scoring_enabled: non_empty("SCORING_ENABLED")
                .map(|v| v.trim().eq_ignore_ascii_case("true"))
                .unwrap_or(defaults.scoring_enabled),
            log_level: non_empty("WECARE_LOG_LEVEL")
                .map(|v| v.trim().to_lowercase())
                .filter(|level| LOG_LEVELS.contains(&level.as_str()))
                .unwrap_or(defaults.log_level),
            ai_timeout: non_empty("WECARE_AI_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.ai_timeout),
        }
    }
}
