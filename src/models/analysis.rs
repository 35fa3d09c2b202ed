//! Analysis models
//!
//! Allergen and diet judgments, the AI collaborator's request/response
//! shapes, and the assembled product analysis.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ProductInfo, Score, ScoringSource};

/// Allergens found in a product
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllergenAnalysis {
    pub detected_allergens: Vec<String>,
    pub user_allergens_present: Vec<String>,
}

impl AllergenAnalysis {
    /// Whether any of the user's allergens were found
    pub fn has_user_allergens(&self) -> bool {
        !self.user_allergens_present.is_empty()
    }
}

/// Compatibility of a product with one diet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DietCompatibility {
    pub diet: String,
    pub compatible: bool,
    pub reason: String,
}

/// Request sent to the AI collaborator
#[derive(Debug, Clone, Serialize)]
pub struct AiServiceInput {
    pub product_info: Value,
    pub user_allergens: Vec<String>,
    pub user_diets: Vec<String>,
    pub calculate_score: bool,
}

/// Response from the AI collaborator (or the fallback analyzer)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiServiceOutput {
    pub allergens_analysis: AllergenAnalysis,
    pub diet_compatibility: Vec<DietCompatibility>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<Score>,
}

/// Complete analysis of one product for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductAnalysis {
    pub product: ProductInfo,
    pub allergens_analysis: AllergenAnalysis,
    pub diet_compatibility: Vec<DietCompatibility>,
    pub scoring_source: ScoringSource,
    /// Allergen and diet judgments came from the fallback analysis
    pub fallback_used: bool,
    pub analyzed_at: DateTime<Utc>,
}

impl ProductAnalysis {
    /// The score attached to the analyzed product
    pub fn score(&self) -> Option<&Score> {
        self.product.score.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_user_allergens() {
        let mut analysis = AllergenAnalysis {
            detected_allergens: vec!["Peanuts".to_string()],
            user_allergens_present: Vec::new(),
        };
        assert!(!analysis.has_user_allergens());

        analysis.user_allergens_present.push("Peanuts".to_string());
        assert!(analysis.has_user_allergens());
    }
}
