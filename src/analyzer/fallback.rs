//! Fallback analysis
//!
//! Substituted for the AI collaborator's answer when the call fails. Every
//! requested diet is reported incompatible and no allergens are listed.

use crate::models::{AiServiceOutput, AllergenAnalysis, DietCompatibility};

pub const FALLBACK_REASON: &str = "Unable to determine compatibility due to analysis error";

/// Build the non-committal analysis used when the AI collaborator fails
pub fn fallback_analysis(_user_allergens: &[String], user_diets: &[String]) -> AiServiceOutput {
    tracing::warn!("Using fallback analysis");

    AiServiceOutput {
        allergens_analysis: AllergenAnalysis::default(),
        diet_compatibility: user_diets
            .iter()
            .map(|diet| DietCompatibility {
                diet: diet.clone(),
                compatible: false,
                reason: FALLBACK_REASON.to_string(),
            })
            .collect(),
        score: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_fallback_shape() {
        let output = fallback_analysis(
            &strings(&["Peanuts", "Dairy"]),
            &strings(&["Vegetarian", "Gluten-Free"]),
        );

        assert!(output.allergens_analysis.detected_allergens.is_empty());
        assert!(output.allergens_analysis.user_allergens_present.is_empty());
        assert_eq!(output.diet_compatibility.len(), 2);
        assert_eq!(output.diet_compatibility[0].diet, "Vegetarian");
        assert_eq!(output.diet_compatibility[1].diet, "Gluten-Free");
        assert!(output
            .diet_compatibility
            .iter()
            .all(|d| !d.compatible && d.reason.contains("Unable to determine")));
        assert!(output.score.is_none());
    }

    #[test]
    fn test_fallback_without_diets() {
        let output = fallback_analysis(&strings(&["Peanuts"]), &[]);
        assert!(output.diet_compatibility.is_empty());
        assert!(output.score.is_none());
    }
}
