//! Product quality score
//!
//! A score is derived once and never mutated; its category is a pure
//! function of the total.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::scoring::{ScoringError, ScoringResult};

/// Quality category for a total score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreCategory {
    Excellent,
    Good,
    Average,
    #[serde(rename = "Low Quality")]
    LowQuality,
    #[serde(rename = "Very Low Quality")]
    VeryLowQuality,
}

/// Inclusive total-score bins, checked in order
const CATEGORY_BINS: [(i64, i64, ScoreCategory); 5] = [
    (81, 100, ScoreCategory::Excellent),
    (61, 80, ScoreCategory::Good),
    (41, 60, ScoreCategory::Average),
    (21, 40, ScoreCategory::LowQuality),
    (0, 20, ScoreCategory::VeryLowQuality),
];

impl ScoreCategory {
    /// Resolve the category for a total score.
    ///
    /// Fails for totals outside 0..=100.
    pub fn from_total(total: i64) -> Result<Self, ScoringError> {
        CATEGORY_BINS
            .iter()
            .find(|(low, high, _)| (*low..=*high).contains(&total))
            .map(|(_, _, category)| *category)
            .ok_or(ScoringError::OutOfRange(total))
    }

    /// Resolve a category label, ignoring case and `_`/`-` separators
    pub fn from_label(label: &str) -> Option<Self> {
        let wanted = label.trim().replace(['_', '-'], " ");
        CATEGORY_BINS
            .iter()
            .map(|(_, _, category)| *category)
            .find(|category| category.as_str().eq_ignore_ascii_case(&wanted))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreCategory::Excellent => "Excellent",
            ScoreCategory::Good => "Good",
            ScoreCategory::Average => "Average",
            ScoreCategory::LowQuality => "Low Quality",
            ScoreCategory::VeryLowQuality => "Very Low Quality",
        }
    }
}

impl std::fmt::Display for ScoreCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Product quality score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub total: u8,
    pub category: ScoreCategory,
    pub nutrition_score: u8,
    pub additives_score: u8,
}

impl Score {
    /// Whether every component lies in 0..=100
    pub fn is_in_range(&self) -> bool {
        self.total <= 100 && self.nutrition_score <= 100 && self.additives_score <= 100
    }

    /// Read a score block supplied by another system
    ///
    /// Points may be integers or integral floats (`82.0`) in 0..=100, and the
    /// category label is matched case-insensitively. Keys missing from
    /// `value` are taken from `defaults`; without defaults every key is
    /// required.
    pub fn from_json(value: &Value, defaults: Option<&Score>) -> ScoringResult<Self> {
        let fields = value
            .as_object()
            .ok_or_else(|| ScoringError::InvalidScore("expected an object".to_string()))?;

        Ok(Self {
            total: points_field(fields, "total", defaults.map(|d| d.total))?,
            category: category_field(fields, defaults.map(|d| d.category))?,
            nutrition_score: points_field(
                fields,
                "nutrition_score",
                defaults.map(|d| d.nutrition_score),
            )?,
            additives_score: points_field(
                fields,
                "additives_score",
                defaults.map(|d| d.additives_score),
            )?,
        })
    }
}

fn points_field(fields: &Map<String, Value>, key: &str, default: Option<u8>) -> ScoringResult<u8> {
    let value = match fields.get(key) {
        None | Some(Value::Null) => {
            return default
                .ok_or_else(|| ScoringError::InvalidScore(format!("`{}` is missing", key)));
        }
        Some(value) => value,
    };

    value
        .as_f64()
        .filter(|points| points.fract() == 0.0 && (0.0..=100.0).contains(points))
        .map(|points| points as u8)
        .ok_or_else(|| {
            ScoringError::InvalidScore(format!(
                "`{}` must be a whole number in 0-100, got {}",
                key, value
            ))
        })
}

fn category_field(
    fields: &Map<String, Value>,
    default: Option<ScoreCategory>,
) -> ScoringResult<ScoreCategory> {
    match fields.get("category") {
        None | Some(Value::Null) => default
            .ok_or_else(|| ScoringError::InvalidScore("`category` is missing".to_string())),
        Some(Value::String(label)) => ScoreCategory::from_label(label)
            .ok_or_else(|| ScoringError::InvalidScore(format!("unknown category `{}`", label))),
        Some(other) => Err(ScoringError::InvalidScore(format!(
            "`category` must be a label, got {}",
            other
        ))),
    }
}

/// Which source produced the score of an analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringSource {
    /// Score embedded in the product data
    External,
    /// Score computed by the AI collaborator
    Ai,
    /// Score computed by the local scoring engine
    Local,
}

impl ScoringSource {
    pub fn describe(&self) -> &'static str {
        match self {
            ScoringSource::External => "External Score (provided with product data)",
            ScoringSource::Ai => "AI-Generated Score",
            ScoringSource::Local => "Local Scoring Engine",
        }
    }
}
