use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;

use pantry::config::PantryConfig;
use pantry::engine::{QueryCleaning, RecommendationConfig, RecommendationEngine, RecommendationService};
use pantry::error::{PantryError, Result};
use pantry::history::{JsonlRecommendationLog, RecommendationLog};
use pantry::model::read_artifact_info;
use pantry::pipeline;
use pantry::storage::Storage;

fn sample_dataset() -> serde_json::Value {
    json!([
        {
            "basic_info": {"title": "Tomato Soup", "category": "Soups", "rating": "4.5"},
            "prep_data": {"prep_time:": "10 mins", "total_time:": "40 mins", "servings:": "4"},
            "ingridients": ["tomato", "onion", "garlic", "olive oil"]
        },
        {
            "basic_info": {"title": "Garlic Bread"},
            "prep_data": {},
            "ingridients": ["bread", "garlic", "butter"]
        },
        {
            "basic_info": {"title": "Pancakes"},
            "prep_data": {},
            "ingridients": ["flour", "egg", "milk", "butter"]
        },
        {
            "basic_info": {"title": "Empty Pot"},
            "ingridients": []
        },
        {
            "basic_info": {"title": "Measurements Only"},
            "ingridients": ["2", "(1/2)"]
        },
        "not a recipe"
    ])
}

fn trained_workspace() -> Result<(TempDir, PantryConfig)> {
    let temp_dir = TempDir::new().unwrap();
    let config = PantryConfig::default().with_data_dir(temp_dir.path());
    std::fs::write(
        config.dataset_path(),
        serde_json::to_vec(&sample_dataset()).unwrap(),
    )
    .unwrap();

    pipeline::clean_and_train(&config)?;
    Ok((temp_dir, config))
}

#[test]
fn clean_and_train_reports_corpus_and_model() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let config = PantryConfig::default().with_data_dir(temp_dir.path());
    std::fs::write(
        config.dataset_path(),
        serde_json::to_vec(&sample_dataset()).unwrap(),
    )
    .unwrap();

    let report = pipeline::clean_and_train(&config)?;
    let stats = report.corpus.expect("corpus stats");
    assert_eq!(stats.loaded, 6);
    assert_eq!(stats.cleaned, 3);
    assert_eq!(stats.skipped, 3);
    assert_eq!(stats.skipped_for("no_ingredients"), 1);
    assert_eq!(stats.skipped_for("no_valid_ingredients"), 1);
    assert_eq!(stats.skipped_for("malformed"), 1);

    // tomato onion garlic olive oil bread butter flour egg milk
    assert_eq!(report.vocabulary_size, 10);
    assert_eq!(report.matrix_shape, (3, 10));
    assert!(config.corpus_path().exists());
    assert!(config.model_path().exists());

    let info = read_artifact_info(&config.storage(), &config.model_file)?;
    assert_eq!(info.size_bytes, report.artifact_bytes);
    Ok(())
}

#[test]
fn cleaned_corpus_keeps_display_fields() -> Result<()> {
    let (_temp_dir, config) = trained_workspace()?;

    let corpus: serde_json::Value =
        serde_json::from_slice(&std::fs::read(config.corpus_path()).unwrap()).unwrap();
    let soup = &corpus[0];
    assert_eq!(soup["name"], "Tomato Soup");
    assert_eq!(soup["ingredients"], json!(["tomato", "onion", "garlic", "olive oil"]));
    assert_eq!(soup["prep_time"], "10 mins");
    assert_eq!(soup["total_time"], "40 mins");
    assert_eq!(soup["servings"], "4");
    assert_eq!(soup["category"], "Soups");
    Ok(())
}

#[test]
fn tomato_and_garlic_rank_tomato_soup_first() -> Result<()> {
    let (_temp_dir, config) = trained_workspace()?;
    let engine = RecommendationEngine::load(&config.storage(), &config.model_file)?;

    let hits = engine.recommend(&["Tomato", "garlic"], 5)?;
    let names: Vec<&str> = hits.iter().map(|hit| hit.recipe.name.as_str()).collect();
    assert_eq!(names, vec!["Tomato Soup", "Garlic Bread"]);
    assert!((hits[0].score - 0.587).abs() < 1e-2);
    assert!((hits[1].score - 0.313).abs() < 1e-2);
    assert!(hits.iter().all(|hit| hit.score > 0.1 && hit.score <= 1.0));
    Ok(())
}

#[test]
fn top_n_and_threshold_limit_results() -> Result<()> {
    let (_temp_dir, config) = trained_workspace()?;
    let engine = RecommendationEngine::load(&config.storage(), &config.model_file)?;

    let hits = engine.recommend(&["tomato", "garlic"], 1)?;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].recipe.name, "Tomato Soup");

    let strict = RecommendationConfig {
        top_n: 5,
        min_score: 0.4,
        query_cleaning: QueryCleaning::Light,
    };
    let hits = engine.recommend_with(&["tomato", "garlic"], &strict)?;
    assert_eq!(hits.len(), 1);

    assert!(engine.recommend(&["tomato"], 0)?.is_empty());
    Ok(())
}

#[test]
fn unknown_ingredients_return_nothing() -> Result<()> {
    let (_temp_dir, config) = trained_workspace()?;
    let engine = RecommendationEngine::load(&config.storage(), &config.model_file)?;

    assert!(engine.recommend(&["chocolate", "vanilla"], 5)?.is_empty());
    Ok(())
}

#[test]
fn blank_query_is_rejected() -> Result<()> {
    let (_temp_dir, config) = trained_workspace()?;
    let engine = RecommendationEngine::load(&config.storage(), &config.model_file)?;

    let err = engine.recommend(&["", "   "], 5).unwrap_err();
    assert!(matches!(err, PantryError::NoValidIngredients(_)));
    assert!(err.is_client_error());
    Ok(())
}

#[test]
fn full_cleaning_strips_quantities_from_the_query() -> Result<()> {
    let (_temp_dir, config) = trained_workspace()?;
    let engine = RecommendationEngine::load(&config.storage(), &config.model_file)?;

    let full = RecommendationConfig {
        query_cleaning: QueryCleaning::Full,
        ..RecommendationConfig::default()
    };
    let hits = engine.recommend_with(&["2 Tomatoes (ripe)", "1/2 cup flour"], &full)?;
    assert_eq!(hits[0].recipe.name, "Pancakes");

    let only_numbers = engine.recommend_with(&["1/2", "(optional)"], &full).unwrap_err();
    assert!(matches!(only_numbers, PantryError::NoValidIngredients(_)));
    Ok(())
}

#[test]
fn service_appends_history_records() -> Result<()> {
    let (_temp_dir, config) = trained_workspace()?;
    let storage: Arc<dyn Storage> = Arc::new(config.storage());
    let log = Arc::new(JsonlRecommendationLog::new(
        Arc::clone(&storage),
        config.history_file.clone(),
    ));

    let engine = RecommendationEngine::load(storage.as_ref(), &config.model_file)?;
    let service = RecommendationService::new(engine).with_log(log.clone() as Arc<dyn RecommendationLog>);

    service.recommend(&["garlic", "butter"], 5)?;
    service.recommend_for_user("user-7", &["flour"], 5)?;

    let records = log.records()?;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].user_id, None);
    assert_eq!(records[0].ingredients, vec!["garlic", "butter"]);
    assert_eq!(records[0].recommendations[0], "Garlic Bread");
    assert_eq!(records[1].user_id.as_deref(), Some("user-7"));
    assert_eq!(records[1].recommendations, vec!["Pancakes"]);
    assert!(config.history_path().exists());
    Ok(())
}

#[test]
fn missing_model_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let config = PantryConfig::default().with_data_dir(temp_dir.path());

    let err = RecommendationEngine::load(&config.storage(), &config.model_file).unwrap_err();
    assert!(matches!(err, PantryError::ModelNotFound(_)));
}

#[test]
fn corrupt_model_is_reported() -> Result<()> {
    let (_temp_dir, config) = trained_workspace()?;

    let mut bytes = std::fs::read(config.model_path()).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xFF;
    std::fs::write(config.model_path(), bytes).unwrap();

    let err = RecommendationEngine::load(&config.storage(), &config.model_file).unwrap_err();
    assert!(matches!(err, PantryError::ModelCorrupt(_)));
    Ok(())
}

#[test]
fn missing_dataset_fails_without_artifacts() {
    let temp_dir = TempDir::new().unwrap();
    let config = PantryConfig::default().with_data_dir(temp_dir.path());

    let err = pipeline::clean_and_train(&config).unwrap_err();
    assert!(matches!(err, PantryError::Dataset(_)));
    assert!(!config.corpus_path().exists());
    assert!(!config.model_path().exists());
}
