//! Scoring error types

use thiserror::Error;

/// Errors raised by the local scoring engine
///
/// Stage variants wrap the inner cause so the message reads as a chain,
/// e.g. "Failed to calculate nutrition score: Error in nutrition scoring:
/// Protein information is missing".
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    #[error("Product data is missing")]
    MissingProductData,

    #[error("Nutrition information is missing")]
    MissingNutrition,

    #[error("{0} information is missing")]
    MissingNutrient(&'static str),

    #[error("{0} information is not in the expected format")]
    MalformedNutrient(&'static str),

    #[error("Error in nutrition scoring: {0}")]
    Nutrient(Box<ScoringError>),

    #[error("Both additives and ingredients information is missing")]
    MissingAdditiveData,

    #[error("{0} additives reference list is missing")]
    MissingReferenceList(&'static str),

    #[error("{0} is not in the expected format")]
    MalformedList(&'static str),

    #[error("Ingredient data is not in the expected format")]
    MalformedIngredient,

    #[error("Ingredient name is missing")]
    MissingIngredientName,

    #[error("Failed to calculate nutrition score: {0}")]
    NutritionStage(Box<ScoringError>),

    #[error("Failed to calculate additives score: {0}")]
    AdditivesStage(Box<ScoringError>),

    #[error("Score {0} is outside the valid range (0-100)")]
    OutOfRange(i64),

    #[error("Score is not in the expected format: {0}")]
    InvalidScore(String),
}

/// Result type for scoring operations
pub type ScoringResult<T> = Result<T, ScoringError>;
