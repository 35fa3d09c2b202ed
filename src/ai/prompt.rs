//! Prompt construction for product analysis

use serde_json::{json, Value};

use crate::models::AiServiceInput;

pub const SYSTEM_PROMPT: &str =
    "You are a precise nutrition analysis assistant that replies only with JSON.";

/// Response shape the model is asked to follow
pub fn default_response_template() -> Value {
    json!({
        "allergens_analysis": {
            "detected_allergens": ["list of allergens in product"],
            "user_allergens_present": ["list of user allergens found in product"]
        },
        "diet_compatibility": [
            {
                "diet": "name of diet",
                "compatible": true,
                "reason": "explanation"
            }
        ],
        "score": {
            "total": 0,
            "category": "category name",
            "nutrition_score": 0,
            "additives_score": 0
        }
    })
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join(", ")
    }
}

/// Build the user prompt for one analysis request
///
/// The `score` section of the template is dropped when no score is requested.
pub fn build_prompt(input: &AiServiceInput, template: &Value) -> String {
    let product_info = serde_json::to_string_pretty(&input.product_info)
        .unwrap_or_else(|_| input.product_info.to_string());

    let mut schema = template.clone();
    if !input.calculate_score {
        if let Some(map) = schema.as_object_mut() {
            map.remove("score");
        }
    }
    let schema = serde_json::to_string_pretty(&schema).unwrap_or_else(|_| schema.to_string());

    let score_task = if input.calculate_score {
        "3. Calculate a product quality score (0-100)\n"
    } else {
        ""
    };

    format!(
        "Analyze the following food product information and provide:\n\
         \n\
         1. Allergen analysis\n\
         2. Diet compatibility assessment\n\
         {score_task}\
         \n\
         PRODUCT INFORMATION:\n\
         {product_info}\n\
         \n\
         USER ALLERGENS: {allergens}\n\
         \n\
         USER DIETARY PREFERENCES: {diets}\n\
         \n\
         SCORING GUIDELINES (if needed):\n\
         - Nutritional value (60% of total): Evaluate proteins, fats, carbs, fiber, \
         salt, calories\n\
         - Additives (40% of total): Evaluate E-codes and other additives\n\
         - Final score should be 0-100 with categories: Excellent (81-100), Good (61-80), \
         Average (41-60), Low Quality (21-40), Very Low Quality (0-20)\n\
         \n\
         Be comprehensive in allergen detection. Only include user allergens that are \
         actually present in the product.\n\
         \n\
         Respond with a JSON object matching this exact schema:\n\
         ```\n\
         {schema}\n\
         ```\n\
         \n\
         Strictly adhere to this schema to ensure consistent responses.\n",
        allergens = join_or_none(&input.user_allergens),
        diets = join_or_none(&input.user_diets),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(calculate_score: bool) -> AiServiceInput {
        AiServiceInput {
            product_info: json!({"name": "Test Product", "ingredients": ["Sugar", "Water"]}),
            user_allergens: vec!["Peanuts".to_string(), "Shellfish".to_string()],
            user_diets: vec!["Vegetarian".to_string(), "Low-Sugar".to_string()],
            calculate_score,
        }
    }

    #[test]
    fn test_prompt_with_scoring() {
        let prompt = build_prompt(&input(true), &default_response_template());
        assert!(prompt.contains("Test Product"));
        assert!(prompt.contains("USER ALLERGENS: Peanuts, Shellfish"));
        assert!(prompt.contains("USER DIETARY PREFERENCES: Vegetarian, Low-Sugar"));
        assert!(prompt.contains("Calculate a product quality score"));
        assert!(prompt.contains("schema"));
        assert!(prompt.contains("\"nutrition_score\""));
    }

    #[test]
    fn test_prompt_without_scoring() {
        let prompt = build_prompt(&input(false), &default_response_template());
        assert!(!prompt.contains("Calculate a product quality score"));
        assert!(!prompt.contains("\"nutrition_score\""));
        assert!(prompt.contains("schema"));
    }

    #[test]
    fn test_prompt_with_no_preferences() {
        let mut request = input(false);
        request.user_allergens.clear();
        request.user_diets.clear();
        let prompt = build_prompt(&request, &default_response_template());
        assert!(prompt.contains("USER ALLERGENS: None"));
        assert!(prompt.contains("USER DIETARY PREFERENCES: None"));
    }

    #[test]
    fn test_prompt_uses_custom_template() {
        let template = json!({"custom": "template"});
        let prompt = build_prompt(&input(true), &template);
        assert!(prompt.contains("\"custom\": \"template\""));
    }
}
