use serde::{Deserialize, Serialize};

use crate::error::{PantryError, Result};

/// How query ingredients are cleaned before vectorization.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryCleaning {
    /// Lowercase and trim each entry, drop empty ones.
    #[default]
    Light,
    /// Run each entry through the corpus ingredient cleaner.
    Full,
}

/// Query-time settings of the recommendation engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationConfig {
    /// Maximum number of recipes returned.
    pub top_n: usize,
    /// Scores must be strictly greater than this to be returned.
    pub min_score: f64,
    pub query_cleaning: QueryCleaning,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        RecommendationConfig {
            top_n: 5,
            min_score: 0.1,
            query_cleaning: QueryCleaning::Light,
        }
    }
}

impl RecommendationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.top_n == 0 {
            return Err(PantryError::invalid_config("top_n must be at least 1"));
        }
        if !self.min_score.is_finite() || self.min_score < 0.0 {
            return Err(PantryError::invalid_config(format!(
                "min_score must be a finite, non-negative number, got {}",
                self.min_score
            )));
        }
        Ok(())
    }
}
