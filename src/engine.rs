//! Query-time recommendation.
//!
//! A [`RecommendationEngine`] wraps a loaded [`VectorSpaceModel`]. It is
//! immutable, cheap to clone and safe to share between threads.
//!
//! # Examples
//!
//! ```
//! use pantry::engine::RecommendationEngine;
//! use pantry::model::train;
//! use pantry::recipe::CleanedRecipe;
//!
//! # fn main() -> pantry::error::Result<()> {
//! let model = train(vec![
//!     CleanedRecipe::new("Guacamole", vec!["avocado".into(), "lime".into()]),
//!     CleanedRecipe::new("Lemonade", vec!["lemon".into(), "sugar".into()]),
//! ])?;
//! let engine = RecommendationEngine::new(model);
//!
//! let results = engine.recommend(&["Avocado"], 5)?;
//! assert_eq!(results[0].recipe.name, "Guacamole");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod service;

use std::sync::Arc;

use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{PantryError, Result};
use crate::model::{VectorSpaceModel, load_model};
use crate::recipe::{CleanedRecipe, IngredientCleaner};
use crate::storage::Storage;

pub use config::{QueryCleaning, RecommendationConfig};
pub use service::RecommendationService;

/// One recommended recipe with its similarity score.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecipe {
    /// Cosine similarity between the query and the recipe, in `[0, 1]`.
    pub score: f64,
    /// Position of the recipe in the corpus.
    #[serde(skip)]
    pub index: usize,
    #[serde(flatten)]
    pub recipe: CleanedRecipe,
}

/// Scores queries against every recipe of a model.
#[derive(Clone, Debug)]
pub struct RecommendationEngine {
    model: Arc<VectorSpaceModel>,
    cleaner: IngredientCleaner,
    config: RecommendationConfig,
}

impl RecommendationEngine {
    pub fn new(model: VectorSpaceModel) -> Self {
        Self::from_shared(Arc::new(model))
    }

    pub fn from_shared(model: Arc<VectorSpaceModel>) -> Self {
        RecommendationEngine {
            model,
            cleaner: IngredientCleaner::new(),
            config: RecommendationConfig::default(),
        }
    }

    /// Load the model artifact `name` from `storage`.
    pub fn load(storage: &dyn Storage, name: &str) -> Result<Self> {
        Ok(Self::new(load_model(storage, name)?))
    }

    pub fn with_config(mut self, config: RecommendationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &RecommendationConfig {
        &self.config
    }

    pub fn model(&self) -> &VectorSpaceModel {
        &self.model
    }

    /// Clean query entries according to `cleaning`, dropping empty ones.
    pub fn clean_query<S: AsRef<str>>(&self, ingredients: &[S], cleaning: QueryCleaning) -> Vec<String> {
        ingredients
            .iter()
            .filter_map(|raw| match cleaning {
                QueryCleaning::Light => {
                    let light = raw.as_ref().trim().to_lowercase();
                    (!light.is_empty()).then_some(light)
                }
                QueryCleaning::Full => self.cleaner.clean_str(raw.as_ref()),
            })
            .collect()
    }

    /// Recommend up to `top_n` recipes using the engine's threshold and cleaning.
    pub fn recommend<S: AsRef<str>>(&self, ingredients: &[S], top_n: usize) -> Result<Vec<ScoredRecipe>> {
        let options = RecommendationConfig {
            top_n,
            ..self.config.clone()
        };
        self.recommend_with(ingredients, &options)
    }

    /// Recommend with explicit options.
    ///
    /// Results have scores strictly above `options.min_score`, sorted by
    /// descending score with ties in corpus order, and at most
    /// `options.top_n` of them.
    pub fn recommend_with<S: AsRef<str>>(
        &self,
        ingredients: &[S],
        options: &RecommendationConfig,
    ) -> Result<Vec<ScoredRecipe>> {
        let cleaned = self.clean_query(ingredients, options.query_cleaning);
        if cleaned.is_empty() {
            return Err(PantryError::no_valid_ingredients(
                "no usable ingredient in the query",
            ));
        }
        if options.top_n == 0 {
            return Ok(Vec::new());
        }

        let query_text = cleaned.join(" ");
        let query = self
            .model
            .vectorizer()
            .transform(&query_text)
            .map_err(PantryError::recommendation)?;
        debug!(
            "Query {query_text:?} matched {} vocabulary terms",
            query.nnz()
        );
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let min_score = options.min_score;
        let mut hits: Vec<(usize, f64)> = self
            .model
            .corpus_vectors()
            .par_iter()
            .enumerate()
            .map(|(index, vector)| (index, query.cosine(vector)))
            .filter(|&(_, score)| score > min_score)
            .collect();

        // Stable: equal scores keep corpus order.
        hits.sort_by(|a, b| b.1.total_cmp(&a.1));
        hits.truncate(options.top_n);

        debug!("Returning {} recommendations", hits.len());
        let recipes = self.model.recipes();
        Ok(hits
            .into_iter()
            .map(|(index, score)| ScoredRecipe {
                score,
                index,
                recipe: recipes[index].clone(),
            })
            .collect())
    }
}
