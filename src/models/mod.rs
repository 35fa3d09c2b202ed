//! Data models
//!
//! Rust structs representing products, scores and analysis results.

mod analysis;
mod nutrition;
mod product;
mod score;

pub use analysis::{
    AiServiceInput, AiServiceOutput, AllergenAnalysis, DietCompatibility, ProductAnalysis,
};
pub use nutrition::{CarbInfo, FatInfo, NutritionInfo};
pub use product::{Ingredient, ProductInfo, Safety, Weight};
pub use score::{Score, ScoreCategory, ScoringSource};
