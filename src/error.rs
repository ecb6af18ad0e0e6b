//! Error types for the Pantry library.
//!
//! All errors are represented by the [`PantryError`] enum. The domain variants
//! follow the stages of the pipeline: dataset loading, training, model loading
//! and querying.
//!
//! # Examples
//!
//! ```
//! use pantry::error::{PantryError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(PantryError::invalid_config("top_n must be positive"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// Boxed error used as the cause of a [`PantryError::Recommendation`].
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The main error type for Pantry operations.
#[derive(Error, Debug)]
pub enum PantryError {
    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The raw dataset is missing or malformed. Fatal to a batch run.
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// There is nothing to train on.
    #[error("Empty corpus: {0}")]
    EmptyCorpus(String),

    /// The trained model artifact does not exist.
    #[error("Model not found at {0}; run `pantry clean-and-train` first")]
    ModelNotFound(String),

    /// The trained model artifact exists but cannot be decoded.
    #[error("Model corrupt: {0}; retrain the model")]
    ModelCorrupt(String),

    /// A query had no usable ingredient after cleaning.
    #[error("No valid ingredients: {0}")]
    NoValidIngredients(String),

    /// Any other failure while answering a query.
    #[error("Recommendation failed: {source}")]
    Recommendation {
        #[source]
        source: BoxedCause,
    },

    /// Analysis-related errors (tokenization, filtering, etc.)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Binary serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid configuration values
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with PantryError.
pub type Result<T> = std::result::Result<T, PantryError>;

impl PantryError {
    /// Create a new dataset error.
    pub fn dataset<S: Into<String>>(msg: S) -> Self {
        PantryError::Dataset(msg.into())
    }

    /// Create a new empty corpus error.
    pub fn empty_corpus<S: Into<String>>(msg: S) -> Self {
        PantryError::EmptyCorpus(msg.into())
    }

    /// Create a new model not found error.
    pub fn model_not_found<S: Into<String>>(location: S) -> Self {
        PantryError::ModelNotFound(location.into())
    }

    /// Create a new model corrupt error.
    pub fn model_corrupt<S: Into<String>>(msg: S) -> Self {
        PantryError::ModelCorrupt(msg.into())
    }

    /// Create a new no valid ingredients error.
    pub fn no_valid_ingredients<S: Into<String>>(msg: S) -> Self {
        PantryError::NoValidIngredients(msg.into())
    }

    /// Wrap any failure that happened while answering a query.
    ///
    /// Errors that already carry a query-level meaning are passed through.
    pub fn recommendation<E>(cause: E) -> Self
    where
        E: Into<BoxedCause>,
    {
        let cause: BoxedCause = cause.into();
        match cause.downcast::<PantryError>() {
            Ok(inner) => match *inner {
                err @ (PantryError::NoValidIngredients(_) | PantryError::Recommendation { .. }) => {
                    err
                }
                other => PantryError::Recommendation {
                    source: Box::new(other),
                },
            },
            Err(source) => PantryError::Recommendation { source },
        }
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        PantryError::Analysis(msg.into())
    }

    /// Create a new storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        PantryError::Storage(msg.into())
    }

    /// Create a new serialization error.
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        PantryError::Serialization(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        PantryError::InvalidConfig(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        PantryError::Other(msg.into())
    }

    /// Whether the failure was caused by the caller's input.
    ///
    /// An HTTP layer maps these to a 4xx response and everything else to a 5xx.
    pub fn is_client_error(&self) -> bool {
        matches!(self, PantryError::NoValidIngredients(_))
    }
}
