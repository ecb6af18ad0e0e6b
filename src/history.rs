//! Append-only log of answered recommendation requests.

pub mod jsonl;
pub mod memory;

use std::fmt::Debug;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;

pub use jsonl::JsonlRecommendationLog;
pub use memory::MemoryRecommendationLog;

/// One answered request: what was asked and which recipes came back.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRecord {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub ingredients: Vec<String>,
    pub timestamp: DateTime<Utc>,
    /// Names of the recommended recipes, best first.
    pub recommendations: Vec<String>,
}

impl RecommendationRecord {
    pub fn new(ingredients: Vec<String>, recommendations: Vec<String>) -> Self {
        RecommendationRecord {
            id: Uuid::new_v4(),
            user_id: None,
            ingredients,
            timestamp: Utc::now(),
            recommendations,
        }
    }

    pub fn with_user_id<S: Into<String>>(mut self, user_id: S) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}

/// Destination for [`RecommendationRecord`]s.
pub trait RecommendationLog: Send + Sync + Debug {
    fn append(&self, record: &RecommendationRecord) -> Result<()>;
}
