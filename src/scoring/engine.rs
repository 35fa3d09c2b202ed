//! Scoring engine
//!
//! Combines the nutrition and additive scores into a total score and
//! category. Stateless: every input, including the additive reference
//! lists, comes from the product data passed in.

use serde::Serialize;
use serde_json::{Map, Value};

use super::additives::{read_additives, score_additives, AdditiveBreakdown};
use super::error::{ScoringError, ScoringResult};
use super::nutrition::{read_nutrition, score_nutrition, NutritionBreakdown};
use crate::models::{Score, ScoreCategory};

/// Share of the nutrition score in the total
pub const NUTRITION_WEIGHT: f64 = 0.6;
/// Share of the additives score in the total
pub const ADDITIVES_WEIGHT: f64 = 0.4;

/// Full scoring detail for one product
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub nutrition: NutritionBreakdown,
    pub additives: AdditiveBreakdown,
    pub score: Score,
}

/// Calculate the quality score of a product
pub fn calculate_score(product: &Value) -> ScoringResult<Score> {
    breakdown(product).map(|b| b.score)
}

/// Calculate the quality score of a product along with every intermediate value
pub fn breakdown(product: &Value) -> ScoringResult<ScoreBreakdown> {
    let product = product_map(product)?;

    let nutrition = read_nutrition(product)
        .map(|reading| score_nutrition(&reading))
        .map_err(|e| ScoringError::NutritionStage(Box::new(e)))?;

    let additives = read_additives(product)
        .map(|(effective, sets)| score_additives(&effective, &sets))
        .map_err(|e| ScoringError::AdditivesStage(Box::new(e)))?;

    let total =
        (nutrition.score * NUTRITION_WEIGHT + additives.score * ADDITIVES_WEIGHT).round() as i64;
    let category = ScoreCategory::from_total(total)?;

    let score = Score {
        total: to_points(total)?,
        category,
        nutrition_score: to_points(nutrition.score.round() as i64)?,
        additives_score: to_points(additives.score.round() as i64)?,
    };

    tracing::debug!(
        "Scored product: nutrition {:.1}, additives {:.1}, total {} ({})",
        nutrition.score,
        additives.score,
        score.total,
        score.category
    );

    Ok(ScoreBreakdown {
        nutrition,
        additives,
        score,
    })
}

fn product_map(product: &Value) -> ScoringResult<&Map<String, Value>> {
    product
        .as_object()
        .filter(|map| !map.is_empty())
        .ok_or(ScoringError::MissingProductData)
}

fn to_points(value: i64) -> ScoringResult<u8> {
    if (0..=100).contains(&value) {
        Ok(value as u8)
    } else {
        Err(ScoringError::OutOfRange(value))
    }
}
