//! Recipe records and their normalization.
//!
//! A [`raw::RawRecipe`] is a lenient view over one record of the scraped
//! dataset. The [`normalizer::RecipeNormalizer`] turns it into a
//! [`cleaned::CleanedRecipe`] using the [`cleaner::IngredientCleaner`], or
//! reports why the record was skipped.

pub mod cleaned;
pub mod cleaner;
pub mod normalizer;
pub mod raw;

pub use cleaned::CleanedRecipe;
pub use cleaner::IngredientCleaner;
pub use normalizer::{NormalizeOutcome, RecipeNormalizer, SkipReason};
pub use raw::RawRecipe;
