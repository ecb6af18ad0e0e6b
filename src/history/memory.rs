use parking_lot::Mutex;

use crate::error::Result;
use crate::history::{RecommendationLog, RecommendationRecord};

/// Keeps records in memory.
#[derive(Debug, Default)]
pub struct MemoryRecommendationLog {
    records: Mutex<Vec<RecommendationRecord>>,
}

impl MemoryRecommendationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the stored records, oldest first.
    pub fn records(&self) -> Vec<RecommendationRecord> {
        self.records.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl RecommendationLog for MemoryRecommendationLog {
    fn append(&self, record: &RecommendationRecord) -> Result<()> {
        self.records.lock().push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_log() {
        let log = MemoryRecommendationLog::new();
        assert!(log.is_empty());

        let record = RecommendationRecord::new(vec!["egg".to_string()], Vec::new());
        log.append(&record).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log.records(), vec![record]);
    }
}
