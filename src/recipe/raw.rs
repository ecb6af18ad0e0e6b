//! Lenient access to raw dataset records.

use serde_json::{Map, Value};

/// One record of the raw dataset.
///
/// Missing or `null` containers read as empty. Only shapes that cannot be
/// interpreted at all (an `ingredients` number, a `basic_info` string) are
/// rejected by [`RawRecipe::from_value`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawRecipe {
    pub basic_info: Map<String, Value>,
    pub prep_data: Map<String, Value>,
    /// `None` when the record has no ingredient list at all.
    pub ingredients: Option<Vec<Value>>,
    pub nutritions: Value,
    pub state: Value,
}

/// Ingredient list keys, in lookup order. The scraped dataset misspells it.
const INGREDIENT_KEYS: [&str; 2] = ["ingridients", "ingredients"];

impl RawRecipe {
    /// Interpret a JSON value as a raw recipe.
    ///
    /// The error string describes the offending shape.
    pub fn from_value(value: &Value) -> Result<Self, String> {
        let record = value
            .as_object()
            .ok_or_else(|| format!("record is {}, expected an object", kind(value)))?;

        let basic_info = object_field(record, "basic_info")?;
        let prep_data = object_field(record, "prep_data")?;

        let ingredients = match INGREDIENT_KEYS
            .iter()
            .find_map(|key| record.get(*key).filter(|v| !v.is_null()))
        {
            None => None,
            Some(Value::Array(items)) => Some(items.clone()),
            Some(other) => {
                return Err(format!(
                    "ingredients is {}, expected an array",
                    kind(other)
                ));
            }
        };

        let nutritions = match record.get("nutritions") {
            None | Some(Value::Null) => Value::Object(Map::new()),
            Some(v) => v.clone(),
        };

        Ok(RawRecipe {
            basic_info,
            prep_data,
            ingredients,
            nutritions,
            state: record.get("state").cloned().unwrap_or(Value::Null),
        })
    }

    /// Recipe title as written in the dataset.
    pub fn title(&self) -> Option<&Value> {
        self.basic_info.get("title").filter(|v| !v.is_null())
    }

    /// Look up a `prep_data` field.
    ///
    /// Dataset keys carry a trailing colon (`"prep_time:"`); the bare key is
    /// accepted as a fallback.
    pub fn prep_field(&self, name: &str) -> Option<&Value> {
        self.prep_data
            .get(&format!("{name}:"))
            .filter(|v| !v.is_null())
            .or_else(|| self.prep_data.get(name).filter(|v| !v.is_null()))
    }

    /// Look up a `basic_info` field.
    pub fn info_field(&self, name: &str) -> Option<&Value> {
        self.basic_info.get(name).filter(|v| !v.is_null())
    }
}

fn object_field(record: &Map<String, Value>, key: &str) -> Result<Map<String, Value>, String> {
    match record.get(key) {
        None | Some(Value::Null) => Ok(Map::new()),
        Some(Value::Object(map)) => Ok(map.clone()),
        Some(other) => Err(format!("{key} is {}, expected an object", kind(other))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Render a JSON scalar as display text. Strings are taken verbatim.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_both_ingredient_spellings() {
        let misspelled = RawRecipe::from_value(&json!({"ingridients": ["salt"]})).unwrap();
        assert_eq!(misspelled.ingredients, Some(vec![json!("salt")]));

        let spelled = RawRecipe::from_value(&json!({"ingredients": ["pepper"]})).unwrap();
        assert_eq!(spelled.ingredients, Some(vec![json!("pepper")]));

        let missing = RawRecipe::from_value(&json!({"ingridients": null})).unwrap();
        assert_eq!(missing.ingredients, None);
    }

    #[test]
    fn test_missing_containers_are_empty() {
        let raw = RawRecipe::from_value(&json!({"basic_info": null})).unwrap();
        assert!(raw.basic_info.is_empty());
        assert!(raw.prep_data.is_empty());
        assert_eq!(raw.nutritions, json!({}));
        assert_eq!(raw.state, Value::Null);
        assert!(raw.title().is_none());
    }

    #[test]
    fn test_prep_field_colon_fallback() {
        let raw = RawRecipe::from_value(&json!({
            "prep_data": {"prep_time:": "10 mins", "servings": 4, "cook_time:": null, "cook_time": "1 hr"}
        }))
        .unwrap();

        assert_eq!(raw.prep_field("prep_time"), Some(&json!("10 mins")));
        assert_eq!(raw.prep_field("servings"), Some(&json!(4)));
        assert_eq!(raw.prep_field("cook_time"), Some(&json!("1 hr")));
        assert_eq!(raw.prep_field("yield"), None);
    }

    #[test]
    fn test_malformed_shapes() {
        let err = RawRecipe::from_value(&json!(["not", "an", "object"])).unwrap_err();
        assert_eq!(err, "record is an array, expected an object");

        let err = RawRecipe::from_value(&json!({"ingridients": 3})).unwrap_err();
        assert_eq!(err, "ingredients is a number, expected an array");

        let err = RawRecipe::from_value(&json!({"basic_info": "Soup"})).unwrap_err();
        assert_eq!(err, "basic_info is a string, expected an object");
    }

    #[test]
    fn test_stringify() {
        assert_eq!(stringify(&json!("4.5")), "4.5");
        assert_eq!(stringify(&json!(4.5)), "4.5");
        assert_eq!(stringify(&json!(12)), "12");
        assert_eq!(stringify(&json!(true)), "true");
        assert_eq!(stringify(&Value::Null), "");
    }
}
