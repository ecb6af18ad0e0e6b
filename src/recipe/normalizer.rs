//! Raw record to [`CleanedRecipe`] normalization.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::recipe::cleaned::CleanedRecipe;
use crate::recipe::cleaner::IngredientCleaner;
use crate::recipe::raw::{RawRecipe, stringify};

/// Display name used when a record has no usable title.
pub const UNKNOWN_RECIPE_NAME: &str = "Unknown Recipe";

/// Why a raw record did not make it into the corpus.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkipReason {
    /// The ingredient list is missing or empty.
    NoIngredients,
    /// Every ingredient cleaned down to nothing.
    NoValidIngredients,
    /// The record cannot be interpreted.
    Malformed(String),
}

impl SkipReason {
    /// Stable label used in statistics.
    pub fn label(&self) -> &'static str {
        match self {
            SkipReason::NoIngredients => "no_ingredients",
            SkipReason::NoValidIngredients => "no_valid_ingredients",
            SkipReason::Malformed(_) => "malformed",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoIngredients => write!(f, "no ingredients"),
            SkipReason::NoValidIngredients => write!(f, "no valid ingredients after cleaning"),
            SkipReason::Malformed(detail) => write!(f, "malformed record: {detail}"),
        }
    }
}

/// Result of normalizing one record.
#[derive(Clone, Debug, PartialEq)]
pub enum NormalizeOutcome {
    Cleaned(CleanedRecipe),
    Skipped(SkipReason),
}

impl NormalizeOutcome {
    pub fn is_cleaned(&self) -> bool {
        matches!(self, NormalizeOutcome::Cleaned(_))
    }

    /// Take the cleaned recipe, if any.
    pub fn into_cleaned(self) -> Option<CleanedRecipe> {
        match self {
            NormalizeOutcome::Cleaned(recipe) => Some(recipe),
            NormalizeOutcome::Skipped(_) => None,
        }
    }
}

/// Turns raw dataset records into cleaned recipes.
///
/// # Examples
///
/// ```
/// use pantry::recipe::{NormalizeOutcome, RecipeNormalizer};
/// use serde_json::json;
///
/// let normalizer = RecipeNormalizer::new();
/// let raw = json!({
///     "basic_info": {"title": "Tomato Soup"},
///     "ingredients": ["2 cups tomatoes (fresh)", "Salt!"]
/// });
///
/// let NormalizeOutcome::Cleaned(recipe) = normalizer.normalize(&raw) else {
///     panic!("expected a cleaned recipe");
/// };
/// assert_eq!(recipe.name, "Tomato Soup");
/// assert_eq!(recipe.ingredients, vec!["cups tomatoes", "salt"]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RecipeNormalizer {
    cleaner: IngredientCleaner,
}

impl RecipeNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cleaner(cleaner: IngredientCleaner) -> Self {
        RecipeNormalizer { cleaner }
    }

    pub fn cleaner(&self) -> &IngredientCleaner {
        &self.cleaner
    }

    /// Normalize one JSON record.
    pub fn normalize(&self, value: &Value) -> NormalizeOutcome {
        match RawRecipe::from_value(value) {
            Ok(raw) => self.normalize_raw(&raw),
            Err(detail) => NormalizeOutcome::Skipped(SkipReason::Malformed(detail)),
        }
    }

    /// Normalize an already interpreted record.
    pub fn normalize_raw(&self, raw: &RawRecipe) -> NormalizeOutcome {
        let raw_ingredients = match &raw.ingredients {
            Some(items) if !items.is_empty() => items,
            _ => return NormalizeOutcome::Skipped(SkipReason::NoIngredients),
        };

        let ingredients: Vec<String> = raw_ingredients
            .iter()
            .filter_map(|item| self.cleaner.clean(Some(item)))
            .collect();

        if ingredients.is_empty() {
            return NormalizeOutcome::Skipped(SkipReason::NoValidIngredients);
        }

        let name = raw
            .title()
            .map(|title| stringify(title).trim().to_string())
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| UNKNOWN_RECIPE_NAME.to_string());

        let mut recipe = CleanedRecipe::new(name, ingredients);
        recipe.prep_time = display(raw.prep_field("prep_time"));
        recipe.cook_time = display(raw.prep_field("cook_time"));
        recipe.additional_time = display(raw.prep_field("additional_time"));
        recipe.total_time = display(raw.prep_field("total_time"));
        recipe.servings = display(raw.prep_field("servings"));
        recipe.yield_ = display(raw.prep_field("yield"));
        recipe.nutritions = raw.nutritions.clone();
        recipe.category = display(raw.info_field("category"));
        recipe.rating = display(raw.info_field("rating"));
        recipe.rating_count = display(raw.info_field("rating_count"));
        recipe.state = display(Some(&raw.state));

        NormalizeOutcome::Cleaned(recipe)
    }
}

/// Stringify a display value, drop every `:` and trim.
fn display(value: Option<&Value>) -> String {
    value
        .map(|v| stringify(v).replace(':', "").trim().to_string())
        .unwrap_or_default()
}
