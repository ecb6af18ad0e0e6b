//! Output formatting for CLI commands.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cli::args::{OutputFormat, PantryArgs};
use crate::corpus::CorpusStats;
use crate::engine::ScoredRecipe;
use crate::error::Result;
use crate::pipeline::TrainingReport;

/// Result of the `clean` command.
#[derive(Debug, Serialize)]
pub struct CleanResult {
    pub corpus_location: String,
    pub stats: CorpusStats,
}

/// Result of the `recommend` command.
#[derive(Debug, Serialize)]
pub struct RecommendationResults {
    pub ingredients: Vec<String>,
    pub recommendations: Vec<ScoredRecipe>,
    pub duration_ms: u64,
}

/// Result of the `stats` command.
#[derive(Debug, Serialize)]
pub struct ModelStats {
    pub model_location: String,
    pub format_version: u32,
    pub created_at: DateTime<Utc>,
    pub artifact_bytes: u64,
    pub recipes: usize,
    pub vocabulary_size: usize,
}

/// Human-readable rendering of a command result.
pub trait HumanReadable {
    fn render_human(&self) -> String;
}

/// Print a result in the selected format.
pub fn output_result<T>(message: &str, result: &T, args: &PantryArgs) -> Result<()>
where
    T: Serialize + HumanReadable,
{
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 0 {
                println!("{message}");
                println!();
            }
            print!("{}", result.render_human());
        }
        OutputFormat::Json => {
            let json = if args.pretty {
                serde_json::to_string_pretty(result)?
            } else {
                serde_json::to_string(result)?
            };
            println!("{json}");
        }
    }
    Ok(())
}

fn render_corpus_stats(out: &mut String, stats: &CorpusStats) {
    let _ = writeln!(out, "Recipes loaded: {}", stats.loaded);
    let _ = writeln!(out, "Recipes cleaned: {}", stats.cleaned);
    let _ = writeln!(out, "Recipes skipped: {}", stats.skipped);
    for (reason, count) in &stats.skip_reasons {
        let _ = writeln!(out, "  {reason}: {count}");
    }
}

impl HumanReadable for CleanResult {
    fn render_human(&self) -> String {
        let mut out = String::new();
        render_corpus_stats(&mut out, &self.stats);
        let _ = writeln!(out, "Cleaned corpus: {}", self.corpus_location);
        out
    }
}

impl HumanReadable for TrainingReport {
    fn render_human(&self) -> String {
        let mut out = String::new();
        if let Some(stats) = &self.corpus {
            render_corpus_stats(&mut out, stats);
        }
        let (rows, columns) = self.matrix_shape;
        let _ = writeln!(out, "Recipes trained: {}", self.recipes);
        let _ = writeln!(out, "Vocabulary size: {}", self.vocabulary_size);
        let _ = writeln!(out, "Feature matrix shape: ({rows}, {columns})");
        let _ = writeln!(
            out,
            "Model: {} ({})",
            self.model_location,
            format_bytes(self.artifact_bytes)
        );
        let _ = writeln!(out, "Elapsed: {}ms", self.elapsed_ms);
        out
    }
}

impl HumanReadable for RecommendationResults {
    fn render_human(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Recommendations for: {}", self.ingredients.join(", "));
        let _ = writeln!(out, "════════════════════");

        if self.recommendations.is_empty() {
            let _ = writeln!(out, "No matching recipes.");
            return out;
        }

        for (rank, hit) in self.recommendations.iter().enumerate() {
            let recipe = &hit.recipe;
            let _ = writeln!(out);
            let _ = writeln!(out, "{}. {} (score: {:.3})", rank + 1, recipe.name, hit.score);
            let _ = writeln!(out, "   Ingredients: {}", recipe.ingredients.join(", "));

            let details: Vec<String> = [
                ("Total time", &recipe.total_time),
                ("Servings", &recipe.servings),
                ("Category", &recipe.category),
                ("Rating", &recipe.rating),
            ]
            .into_iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(label, value)| format!("{label}: {value}"))
            .collect();
            if !details.is_empty() {
                let _ = writeln!(out, "   {}", details.join(" | "));
            }
        }
        out
    }
}

impl HumanReadable for ModelStats {
    fn render_human(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Model Statistics:");
        let _ = writeln!(out, "════════════════");
        let _ = writeln!(out, "Location: {}", self.model_location);
        let _ = writeln!(out, "Format version: {}", self.format_version);
        let _ = writeln!(out, "Created at: {}", self.created_at.to_rfc3339());
        let _ = writeln!(out, "Artifact size: {}", format_bytes(self.artifact_bytes));
        let _ = writeln!(out, "Recipes: {}", self.recipes);
        let _ = writeln!(out, "Vocabulary size: {}", self.vocabulary_size);
        out
    }
}

/// Format bytes into human-readable format.
fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    let unit = UNITS[unit_index];
    if unit_index == 0 {
        format!("{bytes} {unit}")
    } else {
        format!("{size:.1} {unit}")
    }
}
