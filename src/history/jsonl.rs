use std::io::{BufRead, BufReader, Write};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{PantryError, Result};
use crate::history::{RecommendationLog, RecommendationRecord};
use crate::storage::Storage;

/// Appends one JSON document per line to a file in a [`Storage`].
#[derive(Debug)]
pub struct JsonlRecommendationLog {
    storage: Arc<dyn Storage>,
    name: String,
    write_lock: Mutex<()>,
}

impl JsonlRecommendationLog {
    pub fn new<S: Into<String>>(storage: Arc<dyn Storage>, name: S) -> Self {
        JsonlRecommendationLog {
            storage,
            name: name.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read every record back, oldest first. A missing file reads as empty.
    pub fn records(&self) -> Result<Vec<RecommendationRecord>> {
        if !self.storage.file_exists(&self.name) {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(self.storage.open_input(&self.name)?);
        let mut records = Vec::new();
        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record = serde_json::from_str(&line).map_err(|e| {
                PantryError::storage(format!("{}:{}: {e}", self.name, number + 1))
            })?;
            records.push(record);
        }
        Ok(records)
    }
}

impl RecommendationLog for JsonlRecommendationLog {
    fn append(&self, record: &RecommendationRecord) -> Result<()> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        let _guard = self.write_lock.lock();
        let mut output = self.storage.create_output_append(&self.name)?;
        output.write_all(&line)?;
        output.flush_and_sync()?;
        Ok(())
    }
}
