//! Command execution for the pantry CLI.

use std::sync::Arc;
use std::time::Instant;

use log::{debug, info};

use crate::cli::args::{Command, PantryArgs, RecommendArgs};
use crate::cli::output::{CleanResult, ModelStats, RecommendationResults, output_result};
use crate::config::PantryConfig;
use crate::engine::{QueryCleaning, RecommendationConfig, RecommendationEngine, RecommendationService};
use crate::error::Result;
use crate::history::JsonlRecommendationLog;
use crate::model::load_model_with_info;
use crate::pipeline;
use crate::storage::Storage;

/// Execute a CLI command.
pub fn execute_command(args: PantryArgs) -> Result<()> {
    let config = load_config(&args)?;
    debug!("Using data directory {}", config.data_dir.display());

    match &args.command {
        Command::CleanAndTrain => clean_and_train(&config, &args),
        Command::Clean => clean(&config, &args),
        Command::Train => train(&config, &args),
        Command::Recommend(recommend_args) => recommend(&config, recommend_args, &args),
        Command::Stats => stats(&config, &args),
    }
}

/// Resolve the configuration: file (or defaults), then environment, then flags.
pub fn load_config(args: &PantryArgs) -> Result<PantryConfig> {
    let config = match &args.config {
        Some(path) => PantryConfig::from_file(path)?,
        None => PantryConfig::default(),
    };
    let mut config = config.with_env_overrides();
    if let Some(data_dir) = &args.data_dir {
        config = config.with_data_dir(data_dir);
    }
    config.validate()?;
    Ok(config)
}

fn clean_and_train(config: &PantryConfig, args: &PantryArgs) -> Result<()> {
    let report = pipeline::clean_and_train(config)?;
    output_result("Model trained successfully", &report, args)
}

fn clean(config: &PantryConfig, args: &PantryArgs) -> Result<()> {
    let build = pipeline::clean(config)?;
    let result = CleanResult {
        corpus_location: config.corpus_path().display().to_string(),
        stats: build.stats,
    };
    output_result("Dataset cleaned successfully", &result, args)
}

fn train(config: &PantryConfig, args: &PantryArgs) -> Result<()> {
    let report = pipeline::train(config)?;
    output_result("Model trained successfully", &report, args)
}

/// Apply the per-request flags on top of the configured recommendation settings.
fn recommendation_options(
    config: &PantryConfig,
    recommend_args: &RecommendArgs,
) -> Result<RecommendationConfig> {
    let mut options = config.recommendation.clone();
    if let Some(top_n) = recommend_args.top_n {
        options.top_n = top_n;
    }
    if let Some(min_score) = recommend_args.min_score {
        options.min_score = min_score;
    }
    if recommend_args.full_cleaning {
        options.query_cleaning = QueryCleaning::Full;
    }
    options.validate()?;
    Ok(options)
}

fn recommend(config: &PantryConfig, recommend_args: &RecommendArgs, args: &PantryArgs) -> Result<()> {
    let started = Instant::now();
    let options = recommendation_options(config, recommend_args)?;
    let top_n = options.top_n;
    let storage: Arc<dyn Storage> = Arc::new(config.storage());

    let engine = RecommendationEngine::load(storage.as_ref(), &config.model_file)?.with_config(options);
    let mut service = RecommendationService::new(engine);
    if !recommend_args.no_history {
        service = service.with_log(Arc::new(JsonlRecommendationLog::new(
            Arc::clone(&storage),
            config.history_file.clone(),
        )));
    }

    let ingredients = recommend_args.ingredients.as_slice();
    let recommendations = match &recommend_args.user_id {
        Some(user_id) => service.recommend_for_user(user_id, ingredients, top_n)?,
        None => service.recommend(ingredients, top_n)?,
    };
    info!("Found {} recommendations", recommendations.len());

    let results = RecommendationResults {
        ingredients: ingredients.to_vec(),
        recommendations,
        duration_ms: started.elapsed().as_millis() as u64,
    };
    output_result("Recommendations", &results, args)
}

fn stats(config: &PantryConfig, args: &PantryArgs) -> Result<()> {
    let stats = model_stats(&config.storage(), config)?;
    output_result("Model statistics", &stats, args)
}

fn model_stats(storage: &dyn Storage, config: &PantryConfig) -> Result<ModelStats> {
    let (model, info) = load_model_with_info(storage, &config.model_file)?;

    Ok(ModelStats {
        model_location: storage.location(&config.model_file),
        format_version: info.version,
        created_at: info.created_at,
        artifact_bytes: info.size_bytes,
        recipes: model.len(),
        vocabulary_size: model.vocabulary_size(),
    })
}
