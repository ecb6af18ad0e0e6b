//! # Pantry
//!
//! Content-based recipe recommendations from the ingredients you have.
//!
//! Recipes are cleaned into ingredient lists, vectorized with TF-IDF, and
//! ranked against a query by cosine similarity.
//!
//! ## Features
//!
//! - Dataset normalization with per-record skip accounting
//! - TF-IDF vectorizer with a configurable analysis pipeline
//! - Single-file, checksummed model artifact
//! - Parallel scoring with deterministic ordering
//! - Append-only request history
//!
//! ## Example
//!
//! ```
//! use pantry::engine::RecommendationEngine;
//! use pantry::model::train;
//! use pantry::recipe::CleanedRecipe;
//!
//! let recipes = vec![
//!     CleanedRecipe::new("Tomato Soup", vec!["tomato".into(), "onion".into(), "garlic".into()]),
//!     CleanedRecipe::new("Pancakes", vec!["flour".into(), "egg".into(), "milk".into()]),
//! ];
//! let engine = RecommendationEngine::new(train(recipes).unwrap());
//!
//! let hits = engine.recommend(&["tomato", "garlic"], 5).unwrap();
//! assert_eq!(hits[0].recipe.name, "Tomato Soup");
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod history;
pub mod model;
pub mod pipeline;
pub mod recipe;
pub mod storage;
pub mod vectorizer;

pub use error::{PantryError, Result};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
