//! Product info builder
//!
//! Normalizes raw product data into a [`ProductInfo`]. Accepts both the Open
//! Food Facts envelope (`{"product": {...}}` with `nutriments`,
//! `additives_tags`, `quantity`) and flat product records.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use crate::models::{
    CarbInfo, FatInfo, Ingredient, NutritionInfo, ProductInfo, Safety, Score, Weight,
};
use crate::scoring::additives::ADDITIVE_CODE_PREFIX;

const OFF_TAG_PREFIX: &str = "en:";

/// Build the normalized product record from raw product data
pub fn build_product_info(product: &Value, score: Option<Score>) -> ProductInfo {
    let empty = Map::new();
    let root = product.as_object().unwrap_or(&empty);
    let source = root
        .get("product")
        .and_then(Value::as_object)
        .unwrap_or(root);
    let maps = [source, root];

    let harmful = code_set(root.get("harmful_additives"));
    let suspicious = code_set(root.get("suspicious_additives"));

    ProductInfo {
        id: first_string(&maps, &["_id", "id"]).unwrap_or_else(|| "unknown".to_string()),
        barcode: first_string(&maps, &["code", "barcode"]).unwrap_or_else(|| "unknown".to_string()),
        name: first_string(&maps, &["product_name", "product_name_en", "name"])
            .unwrap_or_else(|| "Unknown Product".to_string()),
        manufacturer: first_string(&maps, &["brand_owner", "brands", "manufacturer"])
            .unwrap_or_else(|| "Unknown".to_string()),
        weight: read_weight(source),
        ingredients: read_ingredients(source, &harmful, &suspicious),
        nutrition: read_nutrition(source, root),
        score,
        additives: read_additives(source, root),
        image_url: first_string(&maps, &["image_url", "image_front_url"]),
    }
}

/// Human-readable product name for log messages
pub fn product_name(product: &Value) -> String {
    let empty = Map::new();
    let root = product.as_object().unwrap_or(&empty);
    let source = root
        .get("product")
        .and_then(Value::as_object)
        .unwrap_or(root);
    first_string(&[source, root], &["product_name", "name"])
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Normalize an additive tag like "en:e330" to a code like "E330"
pub fn normalize_additive_tag(tag: &str) -> String {
    tag.trim_start_matches(OFF_TAG_PREFIX).to_uppercase()
}

fn first_string(maps: &[&Map<String, Value>], keys: &[&str]) -> Option<String> {
    maps.iter().find_map(|map| {
        keys.iter().find_map(|key| match map.get(*key) {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
    })
}

fn code_set(value: Option<&Value>) -> BTreeSet<String> {
    value
        .and_then(Value::as_array)
        .map(|codes| {
            codes
                .iter()
                .filter_map(Value::as_str)
                .map(normalize_additive_tag)
                .collect()
        })
        .unwrap_or_default()
}

fn read_weight(source: &Map<String, Value>) -> Weight {
    if let Some(weight) = source
        .get("quantity")
        .and_then(Value::as_str)
        .and_then(Weight::parse)
    {
        return weight;
    }

    source
        .get("weight")
        .and_then(|w| serde_json::from_value(w.clone()).ok())
        .unwrap_or_default()
}

fn classify(code: &str, harmful: &BTreeSet<String>, suspicious: &BTreeSet<String>) -> Safety {
    if harmful.contains(code) {
        Safety::Harmful
    } else if suspicious.contains(code) {
        Safety::Suspicious
    } else {
        Safety::Safe
    }
}

fn read_ingredients(
    source: &Map<String, Value>,
    harmful: &BTreeSet<String>,
    suspicious: &BTreeSet<String>,
) -> Vec<Ingredient> {
    let entries = match source.get("ingredients").and_then(Value::as_array) {
        Some(entries) => entries,
        None => return Vec::new(),
    };

    entries
        .iter()
        .filter_map(|entry| match entry {
            Value::String(name) => Some(Ingredient {
                name: name.clone(),
                safety: Safety::Safe,
            }),
            Value::Object(map) => {
                let name = first_string(&[map], &["text", "name"]).unwrap_or_default();

                let safety = if let Some(label) = map.get("safety").and_then(Value::as_str) {
                    Safety::from_str(label)
                } else if let Some(id) = map
                    .get("id")
                    .and_then(Value::as_str)
                    .filter(|id| id.starts_with("en:e"))
                {
                    classify(&normalize_additive_tag(id), harmful, suspicious)
                } else if name.starts_with(ADDITIVE_CODE_PREFIX) {
                    classify(&name, harmful, suspicious)
                } else {
                    Safety::Safe
                };

                Some(Ingredient { name, safety })
            }
            _ => None,
        })
        .collect()
}

fn number(map: &Map<String, Value>, keys: &[&str]) -> f64 {
    keys.iter()
        .find_map(|key| map.get(*key).and_then(Value::as_f64))
        .unwrap_or(0.0)
}

fn read_nutrition(source: &Map<String, Value>, root: &Map<String, Value>) -> NutritionInfo {
    if let Some(n) = source.get("nutriments").and_then(Value::as_object) {
        return NutritionInfo {
            calories: number(n, &["energy-kcal_100g", "energy-kcal"]),
            protein: number(n, &["proteins_100g", "proteins"]),
            fat: FatInfo {
                total: number(n, &["fat_100g", "fat"]),
                saturated: number(n, &["saturated-fat_100g", "saturated-fat"]),
            },
            carbohydrates: CarbInfo {
                total: number(n, &["carbohydrates_100g", "carbohydrates"]),
                sugar: number(n, &["sugars_100g", "sugars"]),
            },
            fiber: number(n, &["fiber_100g", "fiber"]),
            salt: number(n, &["salt_100g", "salt"]),
            sodium: number(n, &["sodium_100g", "sodium"]),
        };
    }

    let flat = root
        .get("nutrition")
        .or_else(|| source.get("nutrition"))
        .and_then(Value::as_object);

    match flat {
        Some(n) => {
            let empty = Map::new();
            let fat = n.get("fat").and_then(Value::as_object).unwrap_or(&empty);
            let carbs = n.get("carbohydrates").and_then(Value::as_object).unwrap_or(&empty);
            NutritionInfo {
                calories: number(n, &["calories"]),
                protein: number(n, &["protein"]),
                fat: FatInfo {
                    total: number(fat, &["total"]),
                    saturated: number(fat, &["saturated"]),
                },
                carbohydrates: CarbInfo {
                    total: number(carbs, &["total"]),
                    sugar: number(carbs, &["sugar"]),
                },
                fiber: number(n, &["fiber"]),
                salt: number(n, &["salt"]),
                sodium: number(n, &["sodium"]),
            }
        }
        None => NutritionInfo::zero(),
    }
}

fn read_additives(source: &Map<String, Value>, root: &Map<String, Value>) -> Vec<String> {
    if let Some(tags) = source.get("additives_tags").and_then(Value::as_array) {
        return tags
            .iter()
            .filter_map(Value::as_str)
            .map(normalize_additive_tag)
            .collect();
    }

    root.get("additives")
        .and_then(Value::as_array)
        .map(|codes| {
            codes
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScoreCategory;
    use serde_json::json;

    fn off_product() -> Value {
        json!({
            "id": "0737628064502",
            "product": {
                "_id": "0737628064502",
                "code": "0737628064502",
                "product_name": "Thai peanut noodle kit",
                "brand_owner": "Simply Asia Foods, Inc.",
                "quantity": "155 g",
                "ingredients": [
                    {"id": "en:rice", "text": "rice", "percent_estimate": 40},
                    {"id": "en:peanut", "text": "peanut", "percent_estimate": 10},
                    {"id": "en:e330", "text": "citric acid", "percent_estimate": 1},
                    {"id": "en:e250", "text": "sodium nitrite", "percent_estimate": 1}
                ],
                "additives_tags": ["en:e330", "en:e250"],
                "nutriments": {
                    "energy-kcal_100g": 385,
                    "proteins_100g": 9.62,
                    "fat_100g": 7.69,
                    "saturated-fat_100g": 1.92,
                    "carbohydrates_100g": 71.15,
                    "sugars_100g": 13.46,
                    "fiber_100g": 1.9,
                    "salt_100g": 0.72,
                    "sodium_100g": 0.288
                },
                "image_front_url": "https://example.com/image.jpg"
            },
            "safe_additives": ["E300", "E306", "E330"],
            "suspicious_additives": ["E102", "E104"],
            "harmful_additives": ["E211", "E250"]
        })
    }

    #[test]
    fn test_build_from_open_food_facts() {
        let score = Score {
            total: 75,
            category: ScoreCategory::Good,
            nutrition_score: 80,
            additives_score: 70,
        };
        let info = build_product_info(&off_product(), Some(score));

        assert_eq!(info.id, "0737628064502");
        assert_eq!(info.barcode, "0737628064502");
        assert_eq!(info.name, "Thai peanut noodle kit");
        assert_eq!(info.manufacturer, "Simply Asia Foods, Inc.");
        assert_eq!(info.weight.value, 155.0);
        assert_eq!(info.weight.unit, "g");
        assert_eq!(info.nutrition.calories, 385.0);
        assert_eq!(info.nutrition.protein, 9.62);
        assert_eq!(info.nutrition.fat.saturated, 1.92);
        assert_eq!(info.nutrition.carbohydrates.sugar, 13.46);
        assert_eq!(info.nutrition.sodium, 0.288);
        assert_eq!(info.additives, vec!["E330", "E250"]);
        assert_eq!(info.score, Some(score));
        assert_eq!(info.image_url.as_deref(), Some("https://example.com/image.jpg"));
    }

    #[test]
    fn test_ingredient_safety_from_reference_lists() {
        let info = build_product_info(&off_product(), None);
        assert_eq!(info.ingredients.len(), 4);
        assert_eq!(info.ingredients[0].name, "rice");
        assert_eq!(info.ingredients[0].safety, Safety::Safe);
        assert_eq!(info.ingredients[2].safety, Safety::Safe);
        assert_eq!(info.ingredients[3].name, "sodium nitrite");
        assert_eq!(info.ingredients[3].safety, Safety::Harmful);
    }

    #[test]
    fn test_build_from_flat_record() {
        let product = json!({
            "id": "42",
            "barcode": "42",
            "name": "Plain yogurt",
            "manufacturer": "Dairy Co",
            "weight": {"value": 500, "unit": "g"},
            "ingredients": [
                {"name": "milk", "safety": "safe"},
                {"name": "E211", "safety": "harmful"}
            ],
            "nutrition": {
                "calories": 60,
                "protein": 4.0,
                "fat": {"total": 3.0, "saturated": 2.0},
                "carbohydrates": {"total": 5.0, "sugar": 5.0},
                "fiber": 0.0,
                "salt": 0.1,
                "sodium": 0.04
            },
            "additives": ["E211"],
            "image_url": "https://example.com/yogurt.jpg"
        });

        let info = build_product_info(&product, None);
        assert_eq!(info.name, "Plain yogurt");
        assert_eq!(info.manufacturer, "Dairy Co");
        assert_eq!(info.weight.value, 500.0);
        assert_eq!(info.nutrition.fat.saturated, 2.0);
        assert_eq!(info.ingredients[1].safety, Safety::Harmful);
        assert_eq!(info.additives, vec!["E211"]);
        assert!(info.score.is_none());
    }

    #[test]
    fn test_defaults_for_sparse_product() {
        let info = build_product_info(&json!({}), None);
        assert_eq!(info.id, "unknown");
        assert_eq!(info.barcode, "unknown");
        assert_eq!(info.name, "Unknown Product");
        assert_eq!(info.manufacturer, "Unknown");
        assert_eq!(info.weight, Weight::default());
        assert_eq!(info.nutrition, NutritionInfo::zero());
        assert!(info.ingredients.is_empty());
        assert!(info.image_url.is_none());
    }

    #[test]
    fn test_normalize_additive_tag() {
        assert_eq!(normalize_additive_tag("en:e330"), "E330");
        assert_eq!(normalize_additive_tag("E300"), "E300");
    }
}
