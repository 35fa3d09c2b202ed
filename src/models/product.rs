//! Product model
//!
//! Normalized product record built from raw product data.

use serde::{Deserialize, Serialize};

use super::{NutritionInfo, Score};

/// Additive safety classification of an ingredient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Safety {
    #[default]
    Safe,
    Suspicious,
    Harmful,
}

impl Safety {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "suspicious" => Safety::Suspicious,
            "harmful" => Safety::Harmful,
            _ => Safety::Safe,
        }
    }
}

/// Net weight of a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weight {
    pub value: f64,
    pub unit: String,
}

impl Default for Weight {
    fn default() -> Self {
        Self {
            value: 0.0,
            unit: "g".to_string(),
        }
    }
}

impl Weight {
    /// Parse a quantity string like "155 g", "1.5kg" or "330 ml"
    ///
    /// Only the leading number and the unit word directly after it are read;
    /// anything that follows (e.g. "(2 x 77.5 g)") is ignored.
    pub fn parse(quantity: &str) -> Option<Self> {
        let trimmed = quantity.trim();

        let number_end = trimmed
            .char_indices()
            .find(|(_, c)| !(c.is_ascii_digit() || *c == '.'))
            .map(|(i, _)| i)
            .unwrap_or(trimmed.len());
        let value: f64 = trimmed[..number_end].parse().ok()?;

        let rest = trimmed[number_end..].trim_start();
        let unit: String = rest
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .collect();
        if unit.is_empty() {
            return None;
        }

        Some(Self {
            value,
            unit: unit.to_lowercase(),
        })
    }
}

/// An ingredient with its additive safety classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub safety: Safety,
}

/// A product with normalized information and its quality score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInfo {
    pub id: String,
    pub barcode: String,
    pub name: String,
    pub manufacturer: String,
    pub weight: Weight,
    pub ingredients: Vec<Ingredient>,
    pub nutrition: NutritionInfo,
    pub score: Option<Score>,
    pub additives: Vec<String>,
    pub image_url: Option<String>,
}
