//! The query entry point used by front ends.

use std::sync::Arc;

use log::{debug, warn};

use crate::engine::{RecommendationEngine, ScoredRecipe};
use crate::error::{PantryError, Result};
use crate::history::{RecommendationLog, RecommendationRecord};

/// Answers recommendation requests and records them.
///
/// Recording is best effort: a failing [`RecommendationLog`] is logged and
/// the recommendations are still returned.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use pantry::engine::{RecommendationEngine, RecommendationService};
/// use pantry::history::MemoryRecommendationLog;
/// use pantry::model::train;
/// use pantry::recipe::CleanedRecipe;
///
/// # fn main() -> pantry::error::Result<()> {
/// let engine = RecommendationEngine::new(train(vec![
///     CleanedRecipe::new("Hummus", vec!["chickpeas".into(), "tahini".into()]),
/// ])?);
/// let history = Arc::new(MemoryRecommendationLog::new());
/// let service = RecommendationService::new(engine).with_log(history.clone());
///
/// let results = service.recommend(&["chickpeas"], 5)?;
/// assert_eq!(results[0].recipe.name, "Hummus");
/// assert_eq!(history.records()[0].recommendations, vec!["Hummus"]);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct RecommendationService {
    engine: RecommendationEngine,
    log: Option<Arc<dyn RecommendationLog>>,
}

impl RecommendationService {
    /// A service without history.
    pub fn new(engine: RecommendationEngine) -> Self {
        RecommendationService { engine, log: None }
    }

    pub fn with_log(mut self, log: Arc<dyn RecommendationLog>) -> Self {
        self.log = Some(log);
        self
    }

    pub fn engine(&self) -> &RecommendationEngine {
        &self.engine
    }

    /// Recommend up to `top_n` recipes for `ingredients`.
    pub fn recommend<S: AsRef<str>>(&self, ingredients: &[S], top_n: usize) -> Result<Vec<ScoredRecipe>> {
        self.recommend_inner(None, ingredients, top_n)
    }

    /// Same as [`recommend`](Self::recommend), recording the requesting user.
    pub fn recommend_for_user<S: AsRef<str>>(
        &self,
        user_id: &str,
        ingredients: &[S],
        top_n: usize,
    ) -> Result<Vec<ScoredRecipe>> {
        self.recommend_inner(Some(user_id), ingredients, top_n)
    }

    fn recommend_inner<S: AsRef<str>>(
        &self,
        user_id: Option<&str>,
        ingredients: &[S],
        top_n: usize,
    ) -> Result<Vec<ScoredRecipe>> {
        if ingredients.is_empty() {
            return Err(PantryError::no_valid_ingredients("no ingredients provided"));
        }

        let results = self
            .engine
            .recommend(ingredients, top_n)
            .map_err(PantryError::recommendation)?;

        if let Some(log) = &self.log {
            let mut record = RecommendationRecord::new(
                ingredients.iter().map(|s| s.as_ref().to_string()).collect(),
                results.iter().map(|r| r.recipe.name.clone()).collect(),
            );
            if let Some(user_id) = user_id {
                record = record.with_user_id(user_id);
            }

            match log.append(&record) {
                Ok(()) => debug!("Recorded request {}", record.id),
                Err(e) => warn!("Failed to record recommendation request {}: {e}", record.id),
            }
        }

        Ok(results)
    }
}
