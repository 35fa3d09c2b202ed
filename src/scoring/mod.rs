//! Local scoring engine
//!
//! Deterministic product quality scoring:
//!
//! ```text
//! total = round(nutrition × 0.6 + additives × 0.4)
//! ```
//!
//! Both component scores are on a 0-100 scale. All functions here are pure
//! and may be called from any thread.

pub mod additives;
pub mod engine;
mod error;
pub mod nutrition;

pub use additives::{score_additives, AdditiveBreakdown, AdditiveSets};
pub use engine::{breakdown, calculate_score, ScoreBreakdown};
pub use error::{ScoringError, ScoringResult};
pub use nutrition::{score_nutrition, Nutrient, NutritionBreakdown};
