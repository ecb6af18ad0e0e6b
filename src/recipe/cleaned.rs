//! The cleaned recipe record shared by the corpus, the model and the engine.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A recipe after normalization.
///
/// `ingredients` is never empty for records produced by the normalizer.
/// Display fields hold `""` when the source had no value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CleanedRecipe {
    pub name: String,
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub prep_time: String,
    #[serde(default)]
    pub cook_time: String,
    #[serde(default)]
    pub additional_time: String,
    #[serde(default)]
    pub total_time: String,
    #[serde(default)]
    pub servings: String,
    #[serde(rename = "yield", default)]
    pub yield_: String,
    #[serde(default = "empty_object")]
    pub nutritions: Value,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub rating: String,
    #[serde(default)]
    pub rating_count: String,
    #[serde(default)]
    pub state: String,
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

impl CleanedRecipe {
    /// Create a recipe with only a name and ingredients.
    pub fn new<S: Into<String>>(name: S, ingredients: Vec<String>) -> Self {
        CleanedRecipe {
            name: name.into(),
            ingredients,
            prep_time: String::new(),
            cook_time: String::new(),
            additional_time: String::new(),
            total_time: String::new(),
            servings: String::new(),
            yield_: String::new(),
            nutritions: empty_object(),
            category: String::new(),
            rating: String::new(),
            rating_count: String::new(),
            state: String::new(),
        }
    }

    /// The document text the vectorizer sees: ingredients joined by a space.
    pub fn ingredient_text(&self) -> String {
        self.ingredients.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_ingredient_text() {
        let recipe = CleanedRecipe::new(
            "Tomato Soup",
            vec!["cups tomatoes".to_string(), "salt".to_string()],
        );
        assert_eq!(recipe.ingredient_text(), "cups tomatoes salt");
    }

    #[test]
    fn test_yield_field_name() {
        let mut recipe = CleanedRecipe::new("Bread", vec!["flour".to_string()]);
        recipe.yield_ = "1 loaf".to_string();

        let value = serde_json::to_value(&recipe).unwrap();
        assert_eq!(value["yield"], json!("1 loaf"));
        assert!(value.get("yield_").is_none());
        assert_eq!(value["nutritions"], json!({}));
    }

    #[test]
    fn test_missing_display_fields_default() {
        let recipe: CleanedRecipe =
            serde_json::from_value(json!({"name": "Toast", "ingredients": ["bread"]})).unwrap();
        assert_eq!(recipe, CleanedRecipe::new("Toast", vec!["bread".to_string()]));
    }
}
