//! Shared nutrition data structure
//!
//! Per-100g readings used by the scoring engine and product records.

use serde::{Deserialize, Serialize};

/// Fat content breakdown
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FatInfo {
    pub total: f64,     // grams
    pub saturated: f64, // grams
}

/// Carbohydrate content breakdown
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CarbInfo {
    pub total: f64, // grams
    pub sugar: f64, // grams
}

/// Nutritional information per 100g of product
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionInfo {
    pub calories: f64, // kcal
    pub protein: f64,  // grams
    pub fat: FatInfo,
    pub carbohydrates: CarbInfo,
    pub fiber: f64,  // grams
    pub salt: f64,   // grams
    pub sodium: f64, // grams
}

impl NutritionInfo {
    /// Create a new NutritionInfo with all zeros
    pub fn zero() -> Self {
        Self::default()
    }
}
