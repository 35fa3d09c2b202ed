//! Analysis orchestrator
//!
//! Combines an external score (if the product carries one), the AI
//! collaborator's judgments and the local scoring engine into one
//! [`ProductAnalysis`]. Score precedence is External > AI > Local.

pub mod fallback;
pub mod product_info;

use chrono::Utc;
use serde_json::Value;
use thiserror::Error;

use crate::ai::ProductAssistant;
use crate::models::{AiServiceInput, ProductAnalysis, Score, ScoreCategory, ScoringSource};
use crate::scoring::{self, ScoringError};

pub use fallback::{fallback_analysis, FALLBACK_REASON};
pub use product_info::{build_product_info, normalize_additive_tag, product_name};

/// Errors that can occur while analyzing a product
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error("External score is invalid: {0}")]
    ExternalScore(String),
}

/// Where the final score comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreChoice {
    External(Score),
    Ai(Score),
    Local,
}

/// Pick the score source in priority order
///
/// An AI score is only taken when it was requested and actually returned.
pub fn resolve_score_source(
    external: Option<Score>,
    ai_requested: bool,
    ai_score: Option<Score>,
) -> ScoreChoice {
    if let Some(score) = external {
        return ScoreChoice::External(score);
    }
    match ai_score {
        Some(score) if ai_requested => ScoreChoice::Ai(score),
        _ => ScoreChoice::Local,
    }
}

/// Score fields an external score falls back to when it omits them
const EXTERNAL_SCORE_DEFAULTS: Score = Score {
    total: 50,
    category: ScoreCategory::Average,
    nutrition_score: 30,
    additives_score: 20,
};

/// Read a pre-existing score carried by the product
///
/// Missing fields default to 50 / Average / 30 / 20.
pub fn external_score(product: &Value) -> Result<Option<Score>, AnalysisError> {
    match product.get("score") {
        None | Some(Value::Null) => Ok(None),
        Some(raw) => Score::from_json(raw, Some(&EXTERNAL_SCORE_DEFAULTS))
            .map(Some)
            .map_err(|e| AnalysisError::ExternalScore(e.to_string())),
    }
}

/// Product analyzer backed by an AI collaborator
pub struct ProductAnalyzer<A> {
    assistant: A,
}

impl<A: ProductAssistant> ProductAnalyzer<A> {
    pub fn new(assistant: A) -> Self {
        Self { assistant }
    }

    /// Analyze a product for allergens, diet compatibility and score
    ///
    /// The AI collaborator is called exactly once. If it fails, the fallback
    /// analysis replaces its answer and local scoring supplies the score.
    /// Only a local scoring failure (or a malformed external score) is
    /// returned as an error.
    pub fn analyze_product(
        &self,
        product: &Value,
        user_allergens: &[String],
        user_diets: &[String],
        use_ai_scoring: bool,
    ) -> Result<ProductAnalysis, AnalysisError> {
        tracing::info!("Analyzing product: {}", product_name(product));

        let external = external_score(product)?;
        let calculate_score = external.is_none() && use_ai_scoring;

        let input = AiServiceInput {
            product_info: product.clone(),
            user_allergens: user_allergens.to_vec(),
            user_diets: user_diets.to_vec(),
            calculate_score,
        };

        let (ai_output, fallback_used) = match self.assistant.analyze_product(&input) {
            Ok(output) => (output, false),
            Err(e) => {
                tracing::error!("Error during product analysis: {}", e);
                (fallback_analysis(user_allergens, user_diets), true)
            }
        };

        let (score, scoring_source) =
            match resolve_score_source(external, calculate_score, ai_output.score) {
                ScoreChoice::External(score) => (score, ScoringSource::External),
                ScoreChoice::Ai(score) => (score, ScoringSource::Ai),
                ScoreChoice::Local => (scoring::calculate_score(product)?, ScoringSource::Local),
            };
        tracing::debug!(
            "Score {} ({}) from {}",
            score.total,
            score.category,
            scoring_source.describe()
        );

        Ok(ProductAnalysis {
            product: build_product_info(product, Some(score)),
            allergens_analysis: ai_output.allergens_analysis,
            diet_compatibility: ai_output.diet_compatibility,
            scoring_source,
            fallback_used,
            analyzed_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn score(total: u8, category: ScoreCategory) -> Score {
        Score {
            total,
            category,
            nutrition_score: total,
            additives_score: total,
        }
    }

    #[test]
    fn test_resolve_prefers_external() {
        let external = score(88, ScoreCategory::Excellent);
        let ai = score(40, ScoreCategory::LowQuality);
        assert_eq!(
            resolve_score_source(Some(external), true, Some(ai)),
            ScoreChoice::External(external)
        );
    }

    #[test]
    fn test_resolve_ai_only_when_requested() {
        let ai = score(40, ScoreCategory::LowQuality);
        assert_eq!(resolve_score_source(None, true, Some(ai)), ScoreChoice::Ai(ai));
        assert_eq!(resolve_score_source(None, false, Some(ai)), ScoreChoice::Local);
        assert_eq!(resolve_score_source(None, true, None), ScoreChoice::Local);
    }

    #[test]
    fn test_external_score_absent_or_null() {
        assert_eq!(external_score(&json!({"name": "x"})).unwrap(), None);
        assert_eq!(external_score(&json!({"score": null})).unwrap(), None);
    }

    #[test]
    fn test_external_score_defaults() {
        let score = external_score(&json!({"score": {"total": 82, "category": "Excellent"}}))
            .unwrap()
            .unwrap();
        assert_eq!(score.total, 82);
        assert_eq!(score.category, ScoreCategory::Excellent);
        assert_eq!(score.nutrition_score, 30);
        assert_eq!(score.additives_score, 20);

        let empty = external_score(&json!({"score": {}})).unwrap().unwrap();
        assert_eq!(empty.total, 50);
        assert_eq!(empty.category, ScoreCategory::Average);
    }

    #[test]
    fn test_external_score_accepts_loose_types() {
        let score = external_score(&json!({
            "score": {"total": 82.0, "category": "excellent", "nutrition_score": 85.0}
        }))
        .unwrap()
        .unwrap();
        assert_eq!(score.total, 82);
        assert_eq!(score.category, ScoreCategory::Excellent);
        assert_eq!(score.nutrition_score, 85);
        assert_eq!(score.additives_score, 20);
    }

    #[test]
    fn test_external_score_invalid() {
        assert!(matches!(
            external_score(&json!({"score": 75})),
            Err(AnalysisError::ExternalScore(_))
        ));
        assert!(matches!(
            external_score(&json!({"score": {"total": 150}})),
            Err(AnalysisError::ExternalScore(_))
        ));
        assert!(matches!(
            external_score(&json!({"score": {"category": "Superb"}})),
            Err(AnalysisError::ExternalScore(_))
        ));
    }
}
