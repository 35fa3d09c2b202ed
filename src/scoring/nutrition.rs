//! Nutrition scorer
//!
//! Buckets six nutrients into low/medium/high and combines the bucket
//! points into a 0-100 nutrition score.

use serde::Serialize;
use serde_json::{Map, Value};

use super::error::{ScoringError, ScoringResult};
use crate::models::{CarbInfo, FatInfo, NutritionInfo};

/// Points awarded for the best bucket
pub const FULL_POINTS: f64 = 10.0;
/// Points awarded for the middle bucket
pub const HALF_POINTS: f64 = 5.0;

/// A nutrient that contributes to the nutrition score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Nutrient {
    Protein,
    /// Driven by saturated fat
    Fat,
    /// Driven by sugar
    Carbs,
    Fiber,
    Salt,
    Calories,
}

/// Two cutoffs per nutrient; `full` earns 10 points, `half` earns 5
#[derive(Debug, Clone, Copy)]
struct Cutoffs {
    full: f64,
    half: f64,
    more_is_better: bool,
}

impl Nutrient {
    pub const ALL: [Nutrient; 6] = [
        Nutrient::Protein,
        Nutrient::Fat,
        Nutrient::Carbs,
        Nutrient::Fiber,
        Nutrient::Salt,
        Nutrient::Calories,
    ];

    /// Share of this nutrient in the nutrition score (weights sum to 1.0)
    pub fn weight(&self) -> f64 {
        match self {
            Nutrient::Protein => 0.2,
            Nutrient::Fat => 0.2,
            Nutrient::Carbs => 0.2,
            Nutrient::Fiber => 0.1,
            Nutrient::Salt => 0.1,
            Nutrient::Calories => 0.2,
        }
    }

    fn cutoffs(&self) -> Cutoffs {
        // grams (kcal for calories) per 100g
        match self {
            Nutrient::Protein => Cutoffs {
                full: 5.0,
                half: 2.5,
                more_is_better: true,
            },
            Nutrient::Fat => Cutoffs {
                full: 1.5,
                half: 5.0,
                more_is_better: false,
            },
            Nutrient::Carbs => Cutoffs {
                full: 5.0,
                half: 22.5,
                more_is_better: false,
            },
            Nutrient::Fiber => Cutoffs {
                full: 6.0,
                half: 3.0,
                more_is_better: true,
            },
            Nutrient::Salt => Cutoffs {
                full: 0.3,
                half: 1.5,
                more_is_better: false,
            },
            Nutrient::Calories => Cutoffs {
                full: 200.0,
                half: 400.0,
                more_is_better: false,
            },
        }
    }

    /// The reading that drives this nutrient's bucket
    pub fn driver(&self, reading: &NutritionInfo) -> f64 {
        match self {
            Nutrient::Protein => reading.protein,
            Nutrient::Fat => reading.fat.saturated,
            Nutrient::Carbs => reading.carbohydrates.sugar,
            Nutrient::Fiber => reading.fiber,
            Nutrient::Salt => reading.salt,
            Nutrient::Calories => reading.calories,
        }
    }

    /// Bucket points (0, 5 or 10) for a driver value
    pub fn points(&self, value: f64) -> f64 {
        let c = self.cutoffs();
        let (full, half) = if c.more_is_better {
            (value >= c.full, value >= c.half)
        } else {
            (value <= c.full, value <= c.half)
        };

        if full {
            FULL_POINTS
        } else if half {
            HALF_POINTS
        } else {
            0.0
        }
    }
}

/// Points earned by one nutrient
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NutrientPoints {
    pub nutrient: Nutrient,
    pub value: f64,
    pub points: f64,
    pub weight: f64,
}

/// Per-nutrient points and the unrounded 0-100 nutrition score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutritionBreakdown {
    pub components: Vec<NutrientPoints>,
    pub score: f64,
}

/// Score a nutrition reading on the 0-100 scale (unrounded)
pub fn score_nutrition(reading: &NutritionInfo) -> NutritionBreakdown {
    let components: Vec<NutrientPoints> = Nutrient::ALL
        .iter()
        .map(|nutrient| {
            let value = nutrient.driver(reading);
            NutrientPoints {
                nutrient: *nutrient,
                value,
                points: nutrient.points(value),
                weight: nutrient.weight(),
            }
        })
        .collect();

    let weighted: f64 = components.iter().map(|c| c.points * c.weight).sum();

    NutritionBreakdown {
        components,
        score: weighted * FULL_POINTS,
    }
}

/// Extract the nutrition reading from raw product data
///
/// Fails if the `nutrition` block is absent or empty, or if any field the
/// scorer reads is absent or malformed. Per-nutrient failures are wrapped
/// as nutrition scoring errors.
pub fn read_nutrition(product: &Map<String, Value>) -> ScoringResult<NutritionInfo> {
    let nutrition = match product.get("nutrition") {
        None | Some(Value::Null) => return Err(ScoringError::MissingNutrition),
        Some(Value::Object(map)) if map.is_empty() => return Err(ScoringError::MissingNutrition),
        Some(Value::Object(map)) => map,
        Some(_) => return Err(ScoringError::MalformedNutrient("Nutrition")),
    };

    read_fields(nutrition).map_err(|e| ScoringError::Nutrient(Box::new(e)))
}

fn read_fields(nutrition: &Map<String, Value>) -> ScoringResult<NutritionInfo> {
    let protein = required_number(nutrition, "protein", "Protein")?;

    let fat = required_object(nutrition, "fat", "Fat")?;
    let saturated = required_number(fat, "saturated", "Saturated fat")?;

    let carbs = required_object(nutrition, "carbohydrates", "Carbohydrate")?;
    let sugar = required_number(carbs, "sugar", "Sugar")?;

    let fiber = required_number(nutrition, "fiber", "Fiber")?;
    let salt = required_number(nutrition, "salt", "Salt")?;
    let calories = required_number(nutrition, "calories", "Calorie")?;

    Ok(NutritionInfo {
        calories,
        protein,
        fat: FatInfo {
            total: optional_number(fat, "total", "Fat")?,
            saturated,
        },
        carbohydrates: CarbInfo {
            total: optional_number(carbs, "total", "Carbohydrate")?,
            sugar,
        },
        fiber,
        salt,
        sodium: optional_number(nutrition, "sodium", "Sodium")?,
    })
}

fn required_object<'a>(
    map: &'a Map<String, Value>,
    key: &str,
    label: &'static str,
) -> ScoringResult<&'a Map<String, Value>> {
    match map.get(key) {
        None => Err(ScoringError::MissingNutrient(label)),
        Some(Value::Object(inner)) => Ok(inner),
        Some(_) => Err(ScoringError::MalformedNutrient(label)),
    }
}

fn required_number(map: &Map<String, Value>, key: &str, label: &'static str) -> ScoringResult<f64> {
    match map.get(key) {
        None => Err(ScoringError::MissingNutrient(label)),
        Some(value) => as_reading(value, label),
    }
}

fn optional_number(map: &Map<String, Value>, key: &str, label: &'static str) -> ScoringResult<f64> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(0.0),
        Some(value) => as_reading(value, label),
    }
}

fn as_reading(value: &Value, label: &'static str) -> ScoringResult<f64> {
    value
        .as_f64()
        .filter(|v| *v >= 0.0)
        .ok_or(ScoringError::MalformedNutrient(label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reading(
        protein: f64,
        saturated: f64,
        sugar: f64,
        fiber: f64,
        salt: f64,
        calories: f64,
    ) -> NutritionInfo {
        NutritionInfo {
            calories,
            protein,
            fat: FatInfo { total: 10.0, saturated },
            carbohydrates: CarbInfo { total: 40.0, sugar },
            fiber,
            salt,
            sodium: 0.1,
        }
    }

    fn product(nutrition: Value) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("nutrition".to_string(), nutrition);
        map
    }

    #[test]
    fn test_protein_buckets() {
        assert_eq!(Nutrient::Protein.points(5.0), 10.0);
        assert_eq!(Nutrient::Protein.points(4.9), 5.0);
        assert_eq!(Nutrient::Protein.points(2.5), 5.0);
        assert_eq!(Nutrient::Protein.points(2.4), 0.0);
    }

    #[test]
    fn test_less_is_better_buckets() {
        assert_eq!(Nutrient::Fat.points(1.5), 10.0);
        assert_eq!(Nutrient::Fat.points(5.0), 5.0);
        assert_eq!(Nutrient::Fat.points(5.1), 0.0);
        assert_eq!(Nutrient::Carbs.points(22.5), 5.0);
        assert_eq!(Nutrient::Salt.points(0.3), 10.0);
        assert_eq!(Nutrient::Salt.points(1.6), 0.0);
        assert_eq!(Nutrient::Calories.points(200.0), 10.0);
        assert_eq!(Nutrient::Calories.points(400.0), 5.0);
        assert_eq!(Nutrient::Calories.points(401.0), 0.0);
    }

    #[test]
    fn test_weights_sum_to_one() {
        let total: f64 = Nutrient::ALL.iter().map(|n| n.weight()).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_score_healthy_reading() {
        let breakdown = score_nutrition(&reading(8.5, 1.2, 4.5, 6.5, 0.2, 350.0));
        assert!((breakdown.score - 90.0).abs() < 1e-9);
        assert_eq!(breakdown.components.len(), 6);
    }

    #[test]
    fn test_score_worst_reading() {
        let breakdown = score_nutrition(&reading(1.0, 6.0, 25.0, 1.5, 2.0, 450.0));
        assert_eq!(breakdown.score, 0.0);
    }

    #[test]
    fn test_one_bucket_step_moves_score_by_weight() {
        let base = score_nutrition(&reading(1.0, 6.0, 25.0, 1.5, 2.0, 450.0)).score;

        // protein low -> medium: 0.2 * 5 * 10
        let protein_step = score_nutrition(&reading(3.0, 6.0, 25.0, 1.5, 2.0, 450.0)).score;
        assert!((protein_step - base - 10.0).abs() < 1e-9);

        // fiber low -> medium: 0.1 * 5 * 10
        let fiber_step = score_nutrition(&reading(1.0, 6.0, 25.0, 4.0, 2.0, 450.0)).score;
        assert!((fiber_step - base - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_read_nutrition_missing_block() {
        assert_eq!(read_nutrition(&Map::new()), Err(ScoringError::MissingNutrition));
        assert_eq!(read_nutrition(&product(json!({}))), Err(ScoringError::MissingNutrition));
        assert_eq!(read_nutrition(&product(Value::Null)), Err(ScoringError::MissingNutrition));
    }

    #[test]
    fn test_read_nutrition_missing_field() {
        let err = read_nutrition(&product(json!({
            "calories": 100,
            "fat": {"saturated": 1.0},
            "carbohydrates": {"sugar": 1.0},
            "fiber": 1.0,
            "salt": 0.1
        })))
        .unwrap_err();
        assert_eq!(err.to_string(), "Error in nutrition scoring: Protein information is missing");
    }

    #[test]
    fn test_read_nutrition_malformed_fat() {
        let err = read_nutrition(&product(json!({
            "calories": 100,
            "protein": 3.0,
            "fat": 4.0,
            "carbohydrates": {"sugar": 1.0},
            "fiber": 1.0,
            "salt": 0.1
        })))
        .unwrap_err();
        assert!(err.to_string().contains("Fat information is not in the expected format"));
    }

    #[test]
    fn test_read_nutrition_missing_sugar() {
        let err = read_nutrition(&product(json!({
            "calories": 100,
            "protein": 3.0,
            "fat": {"saturated": 1.0},
            "carbohydrates": {"total": 12.0},
            "fiber": 1.0,
            "salt": 0.1
        })))
        .unwrap_err();
        assert!(err.to_string().contains("Sugar information is missing"));
    }

    #[test]
    fn test_read_nutrition_defaults_optional_totals() {
        let info = read_nutrition(&product(json!({
            "calories": 100,
            "protein": 3.0,
            "fat": {"saturated": 1.0},
            "carbohydrates": {"sugar": 1.0},
            "fiber": 1.0,
            "salt": 0.1
        })))
        .unwrap();
        assert_eq!(info.fat.total, 0.0);
        assert_eq!(info.carbohydrates.total, 0.0);
        assert_eq!(info.sodium, 0.0);
        assert_eq!(info.fat.saturated, 1.0);
    }

    #[test]
    fn test_read_nutrition_rejects_text_values() {
        let err = read_nutrition(&product(json!({
            "calories": "lots",
            "protein": 3.0,
            "fat": {"saturated": 1.0},
            "carbohydrates": {"sugar": 1.0},
            "fiber": 1.0,
            "salt": 0.1
        })))
        .unwrap_err();
        assert!(err.to_string().contains("Calorie information is not in the expected format"));
    }
}
