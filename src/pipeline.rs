//! Batch jobs: build the cleaned corpus and train the model artifact.
//!
//! Each job has a variant over an explicit [`Storage`] and a convenience
//! form that uses the file storage rooted at [`PantryConfig::data_dir`].

use std::time::Instant;

use log::info;
use serde::Serialize;

use crate::config::PantryConfig;
use crate::corpus::{CorpusBuild, CorpusBuilder, CorpusStats, load_corpus, load_dataset, save_corpus};
use crate::error::Result;
use crate::model::{VectorSpaceTrainer, save_model};
use crate::recipe::CleanedRecipe;
use crate::storage::Storage;

/// Summary of a training run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrainingReport {
    /// Corpus counts, when the run also cleaned the dataset.
    pub corpus: Option<CorpusStats>,
    pub recipes: usize,
    pub vocabulary_size: usize,
    /// `(recipes, vocabulary terms)`.
    pub matrix_shape: (usize, usize),
    pub artifact_bytes: u64,
    pub model_location: String,
    pub elapsed_ms: u128,
}

/// Load the dataset, normalize it and save the cleaned corpus.
pub fn clean_with(storage: &dyn Storage, config: &PantryConfig) -> Result<CorpusBuild> {
    let records = load_dataset(storage, &config.dataset_file)?;
    let build = CorpusBuilder::new().build(&records);
    save_corpus(storage, &config.corpus_file, &build.recipes)?;
    Ok(build)
}

/// Train from the saved cleaned corpus and save the artifact.
pub fn train_with(storage: &dyn Storage, config: &PantryConfig) -> Result<TrainingReport> {
    let started = Instant::now();
    let recipes = load_corpus(storage, &config.corpus_file)?;
    train_recipes(storage, config, recipes, None, started)
}

/// The full batch job: clean, save the corpus, train, save the artifact.
///
/// Any fatal error fails the run; the previous artifact stays in place.
pub fn clean_and_train_with(storage: &dyn Storage, config: &PantryConfig) -> Result<TrainingReport> {
    let started = Instant::now();
    info!("Starting recipe recommendation model training");

    let CorpusBuild { recipes, stats } = clean_with(storage, config)?;
    let report = train_recipes(storage, config, recipes, Some(stats), started)?;

    info!("Training completed in {} ms", report.elapsed_ms);
    Ok(report)
}

fn train_recipes(
    storage: &dyn Storage,
    config: &PantryConfig,
    recipes: Vec<CleanedRecipe>,
    corpus: Option<CorpusStats>,
    started: Instant,
) -> Result<TrainingReport> {
    let model = VectorSpaceTrainer::new(config.vectorizer.clone()).train(recipes)?;
    let artifact_bytes = save_model(storage, &config.model_file, &model)?;

    Ok(TrainingReport {
        corpus,
        recipes: model.len(),
        vocabulary_size: model.vocabulary_size(),
        matrix_shape: model.shape(),
        artifact_bytes,
        model_location: storage.location(&config.model_file),
        elapsed_ms: started.elapsed().as_millis(),
    })
}

/// [`clean_with`] over the configured data directory.
pub fn clean(config: &PantryConfig) -> Result<CorpusBuild> {
    clean_with(&config.storage(), config)
}

/// [`train_with`] over the configured data directory.
pub fn train(config: &PantryConfig) -> Result<TrainingReport> {
    train_with(&config.storage(), config)
}

/// [`clean_and_train_with`] over the configured data directory.
pub fn clean_and_train(config: &PantryConfig) -> Result<TrainingReport> {
    clean_and_train_with(&config.storage(), config)
}
