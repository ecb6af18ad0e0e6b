use std::collections::BTreeMap;

use log::{debug, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::recipe::{CleanedRecipe, NormalizeOutcome, RecipeNormalizer, SkipReason};

/// Counts reported by a corpus build.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusStats {
    /// Records in the raw dataset.
    pub loaded: usize,
    /// Records that became cleaned recipes.
    pub cleaned: usize,
    /// Records that were skipped.
    pub skipped: usize,
    /// Skipped records per [`SkipReason::label`].
    pub skip_reasons: BTreeMap<String, usize>,
}

impl CorpusStats {
    fn record_skip(&mut self, reason: &SkipReason) {
        self.skipped += 1;
        *self.skip_reasons.entry(reason.label().to_string()).or_insert(0) += 1;
    }

    /// Number of records skipped for the given reason.
    pub fn skipped_for(&self, label: &str) -> usize {
        self.skip_reasons.get(label).copied().unwrap_or(0)
    }
}

/// The cleaned recipes of a build, in dataset order, plus its counts.
#[derive(Clone, Debug, PartialEq)]
pub struct CorpusBuild {
    pub recipes: Vec<CleanedRecipe>,
    pub stats: CorpusStats,
}

/// Runs the [`RecipeNormalizer`] over a whole dataset.
#[derive(Clone, Debug, Default)]
pub struct CorpusBuilder {
    normalizer: RecipeNormalizer,
}

impl CorpusBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_normalizer(normalizer: RecipeNormalizer) -> Self {
        CorpusBuilder { normalizer }
    }

    /// Normalize every record. Skips never abort the build.
    pub fn build(&self, records: &[Value]) -> CorpusBuild {
        let outcomes: Vec<NormalizeOutcome> = records
            .par_iter()
            .map(|record| self.normalizer.normalize(record))
            .collect();

        let mut stats = CorpusStats {
            loaded: records.len(),
            ..CorpusStats::default()
        };
        let mut recipes = Vec::with_capacity(outcomes.len());

        for (index, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                NormalizeOutcome::Cleaned(recipe) => recipes.push(recipe),
                NormalizeOutcome::Skipped(reason) => {
                    if let SkipReason::Malformed(detail) = &reason {
                        warn!("Skipping malformed record #{index}: {detail}");
                    } else {
                        debug!("Skipping record #{index}: {reason}");
                    }
                    stats.record_skip(&reason);
                }
            }
        }
        stats.cleaned = recipes.len();

        info!(
            "Cleaned {} of {} recipes, skipped {}",
            stats.cleaned, stats.loaded, stats.skipped
        );
        for (label, count) in &stats.skip_reasons {
            info!("  skipped {count} ({label})");
        }

        CorpusBuild { recipes, stats }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_build_keeps_order_and_counts() {
        let records = vec![
            json!({"basic_info": {"title": "A"}, "ingridients": ["1 egg"]}),
            json!({"basic_info": {"title": "B"}, "ingridients": []}),
            json!({"basic_info": {"title": "C"}, "ingridients": [null, "2"]}),
            json!(42),
            json!({"basic_info": {"title": "D"}, "ingredients": ["Flour", "Water"]}),
        ];

        let build = CorpusBuilder::new().build(&records);

        let names: Vec<&str> = build.recipes.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["A", "D"]);
        assert_eq!(build.stats.loaded, 5);
        assert_eq!(build.stats.cleaned, 2);
        assert_eq!(build.stats.skipped, 3);
        assert_eq!(build.stats.skipped_for("no_ingredients"), 1);
        assert_eq!(build.stats.skipped_for("no_valid_ingredients"), 1);
        assert_eq!(build.stats.skipped_for("malformed"), 1);
        assert!(build.recipes.iter().all(|r| !r.ingredients.is_empty()));
    }

    #[test]
    fn test_empty_dataset() {
        let build = CorpusBuilder::new().build(&[]);
        assert!(build.recipes.is_empty());
        assert_eq!(build.stats, CorpusStats::default());
    }
}
