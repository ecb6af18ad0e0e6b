//! Dataset and cleaned corpus files.

use log::info;
use serde_json::Value;

use crate::error::{PantryError, Result};
use crate::recipe::CleanedRecipe;
use crate::storage::{Storage, read_all, write_atomic};

/// Read the raw dataset: a JSON array of recipe records.
///
/// Every failure is reported as [`PantryError::Dataset`].
pub fn load_dataset(storage: &dyn Storage, name: &str) -> Result<Vec<Value>> {
    let location = storage.location(name);
    if !storage.file_exists(name) {
        return Err(PantryError::dataset(format!(
            "Dataset not found at {location}"
        )));
    }

    let bytes = read_all(storage, name)
        .map_err(|e| PantryError::dataset(format!("Cannot read dataset {location}: {e}")))?;
    let value: Value = serde_json::from_slice(&bytes)
        .map_err(|e| PantryError::dataset(format!("Invalid JSON in dataset {location}: {e}")))?;

    match value {
        Value::Array(records) => {
            info!("Loaded {} recipes from {location}", records.len());
            Ok(records)
        }
        _ => Err(PantryError::dataset(format!(
            "Dataset {location} is not a JSON array"
        ))),
    }
}

/// Write the cleaned corpus as pretty-printed JSON, atomically.
pub fn save_corpus(storage: &dyn Storage, name: &str, recipes: &[CleanedRecipe]) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(recipes)?;
    write_atomic(storage, name, &bytes)?;
    info!(
        "Saved {} cleaned recipes to {}",
        recipes.len(),
        storage.location(name)
    );
    Ok(())
}

/// Read a cleaned corpus written by [`save_corpus`].
pub fn load_corpus(storage: &dyn Storage, name: &str) -> Result<Vec<CleanedRecipe>> {
    let location = storage.location(name);
    if !storage.file_exists(name) {
        return Err(PantryError::dataset(format!(
            "Cleaned corpus not found at {location}; run `pantry clean` first"
        )));
    }

    let bytes = read_all(storage, name)?;
    let recipes: Vec<CleanedRecipe> = serde_json::from_slice(&bytes).map_err(|e| {
        PantryError::dataset(format!("Invalid cleaned corpus {location}: {e}"))
    })?;

    if let Some(position) = recipes.iter().position(|r| r.ingredients.is_empty()) {
        return Err(PantryError::dataset(format!(
            "Cleaned corpus {location} has a recipe without ingredients at index {position}"
        )));
    }

    info!("Loaded {} cleaned recipes from {location}", recipes.len());
    Ok(recipes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryStorage;

    #[test]
    fn test_load_dataset() {
        let storage = MemoryStorage::new();
        storage.put("recipes.json", br#"[{"ingridients": ["salt"]}, null]"#.to_vec());

        let records = load_dataset(&storage, "recipes.json").unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_load_dataset_errors() {
        let storage = MemoryStorage::new();
        let missing = load_dataset(&storage, "recipes.json").unwrap_err();
        assert!(matches!(missing, PantryError::Dataset(_)));
        assert!(missing.to_string().contains("not found"));

        storage.put("broken.json", b"[{".to_vec());
        let broken = load_dataset(&storage, "broken.json").unwrap_err();
        assert!(matches!(broken, PantryError::Dataset(_)));
        assert!(broken.to_string().contains("Invalid JSON"));

        storage.put("object.json", br#"{"recipes": []}"#.to_vec());
        let object = load_dataset(&storage, "object.json").unwrap_err();
        assert!(object.to_string().contains("not a JSON array"));
    }

    #[test]
    fn test_corpus_round_trip_keeps_non_ascii() {
        let storage = MemoryStorage::new();
        let mut recipe = CleanedRecipe::new("Crème Brûlée", vec!["heavy cream".to_string()]);
        recipe.yield_ = "6 ramekins".to_string();

        save_corpus(&storage, "cleaned_recipes.json", std::slice::from_ref(&recipe)).unwrap();

        let text = String::from_utf8(read_all(&storage, "cleaned_recipes.json").unwrap()).unwrap();
        assert!(text.contains("Crème Brûlée"));
        assert!(text.contains("\n  {"));
        assert!(text.contains("\"yield\": \"6 ramekins\""));

        let loaded = load_corpus(&storage, "cleaned_recipes.json").unwrap();
        assert_eq!(loaded, vec![recipe]);
    }

    #[test]
    fn test_load_corpus_rejects_empty_ingredients() {
        let storage = MemoryStorage::new();
        storage.put("cleaned_recipes.json", br#"[{"name": "Air", "ingredients": []}]"#.to_vec());

        let err = load_corpus(&storage, "cleaned_recipes.json").unwrap_err();
        assert!(matches!(err, PantryError::Dataset(_)));
    }
}
