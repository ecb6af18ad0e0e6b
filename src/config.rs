//! Configuration for the batch pipeline and the query engine.
//!
//! ```
//! use pantry::config::PantryConfig;
//!
//! let config: PantryConfig = serde_json::from_str(r#"{
//!     "data_dir": "/var/lib/pantry",
//!     "recommendation": {"top_n": 10}
//! }"#).unwrap();
//!
//! assert_eq!(config.model_file, "recommendation_model.bin");
//! assert_eq!(config.recommendation.top_n, 10);
//! assert!(config.validate().is_ok());
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::engine::RecommendationConfig;
use crate::error::{PantryError, Result};
use crate::storage::StorageConfig;
use crate::storage::file::FileStorage;
use crate::vectorizer::VectorizerConfig;

/// Environment variable overriding [`PantryConfig::data_dir`].
pub const DATA_DIR_ENV: &str = "PANTRY_DATA_DIR";

/// Top-level configuration.
///
/// File names are relative to `data_dir`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PantryConfig {
    pub data_dir: PathBuf,
    /// Raw scraped dataset (JSON array).
    pub dataset_file: String,
    /// Cleaned corpus written by the batch job.
    pub corpus_file: String,
    /// Trained model artifact.
    pub model_file: String,
    /// JSON-lines request history.
    pub history_file: String,
    pub storage: StorageConfig,
    pub vectorizer: VectorizerConfig,
    pub recommendation: RecommendationConfig,
}

impl Default for PantryConfig {
    fn default() -> Self {
        PantryConfig {
            data_dir: PathBuf::from("data"),
            dataset_file: "recipes.json".to_string(),
            corpus_file: "cleaned_recipes.json".to_string(),
            model_file: "recommendation_model.bin".to_string(),
            history_file: "user_requests.jsonl".to_string(),
            storage: StorageConfig::default(),
            vectorizer: VectorizerConfig::default(),
            recommendation: RecommendationConfig::default(),
        }
    }
}

impl PantryConfig {
    /// Read a JSON configuration file. Missing keys take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            PantryError::invalid_config(format!("cannot read {}: {e}", path.display()))
        })?;
        serde_json::from_str(&text)
            .map_err(|e| PantryError::invalid_config(format!("{}: {e}", path.display())))
    }

    /// Apply [`DATA_DIR_ENV`] if it is set and non-empty.
    pub fn with_env_overrides(self) -> Self {
        match std::env::var_os(DATA_DIR_ENV) {
            Some(dir) if !dir.is_empty() => self.with_data_dir(dir),
            _ => self,
        }
    }

    pub fn with_data_dir<P: Into<PathBuf>>(mut self, data_dir: P) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    /// Check every value; the first problem is reported.
    pub fn validate(&self) -> Result<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(PantryError::invalid_config("data_dir must not be empty"));
        }
        for (key, value) in [
            ("dataset_file", &self.dataset_file),
            ("corpus_file", &self.corpus_file),
            ("model_file", &self.model_file),
            ("history_file", &self.history_file),
        ] {
            if value.trim().is_empty() {
                return Err(PantryError::invalid_config(format!("{key} must not be empty")));
            }
        }
        if self.storage.buffer_size == 0 {
            return Err(PantryError::invalid_config("storage.buffer_size must be positive"));
        }
        self.vectorizer.validate()?;
        self.recommendation.validate()
    }

    /// Storage rooted at `data_dir`, created on first write.
    pub fn storage(&self) -> FileStorage {
        FileStorage::open(&self.data_dir, self.storage.clone())
    }

    pub fn dataset_path(&self) -> PathBuf {
        self.data_dir.join(&self.dataset_file)
    }

    pub fn corpus_path(&self) -> PathBuf {
        self.data_dir.join(&self.corpus_file)
    }

    pub fn model_path(&self) -> PathBuf {
        self.data_dir.join(&self.model_file)
    }

    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join(&self.history_file)
    }
}
