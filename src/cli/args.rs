//! Command line argument parsing for the pantry CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// pantry - recipe recommendations from the ingredients you have
#[derive(Parser, Debug, Clone)]
#[command(name = "pantry")]
#[command(about = "Recommend recipes from the ingredients you have on hand")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct PantryArgs {
    /// JSON configuration file
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Data directory (overrides the configuration and PANTRY_DATA_DIR)
    #[arg(long, value_name = "DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl PantryArgs {
    /// Effective verbosity: 0 quiet, 1 normal, 2 verbose, 3+ debug.
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose.saturating_add(1)
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Clean the raw dataset and train the model
    #[command(name = "clean-and-train")]
    CleanAndTrain,

    /// Clean the raw dataset and save the cleaned corpus
    Clean,

    /// Train the model from the saved cleaned corpus
    Train,

    /// Recommend recipes for a list of ingredients
    Recommend(RecommendArgs),

    /// Show model statistics
    Stats,
}

/// Arguments for recommending
#[derive(Parser, Debug, Clone)]
pub struct RecommendArgs {
    /// Ingredients on hand
    #[arg(value_name = "INGREDIENT", required = true, num_args = 1..)]
    pub ingredients: Vec<String>,

    /// Maximum number of recipes to return
    #[arg(short = 'n', long)]
    pub top_n: Option<usize>,

    /// Minimum similarity score, exclusive
    #[arg(long)]
    pub min_score: Option<f64>,

    /// Clean the query like the corpus (strip quantities, asides and punctuation)
    #[arg(long)]
    pub full_cleaning: bool,

    /// Do not record the request in the history log
    #[arg(long)]
    pub no_history: bool,

    /// User id stored with the request
    #[arg(long)]
    pub user_id: Option<String>,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommend_command() {
        let args = PantryArgs::try_parse_from([
            "pantry",
            "recommend",
            "garlic",
            "olive oil",
            "--top-n",
            "3",
            "--min-score",
            "0.2",
            "--full-cleaning",
            "--no-history",
        ])
        .unwrap();

        if let Command::Recommend(recommend_args) = args.command {
            assert_eq!(recommend_args.ingredients, vec!["garlic", "olive oil"]);
            assert_eq!(recommend_args.top_n, Some(3));
            assert_eq!(recommend_args.min_score, Some(0.2));
            assert!(recommend_args.full_cleaning);
            assert!(recommend_args.no_history);
            assert_eq!(recommend_args.user_id, None);
        } else {
            panic!("Expected Recommend command");
        }
    }

    #[test]
    fn test_recommend_requires_ingredients() {
        assert!(PantryArgs::try_parse_from(["pantry", "recommend"]).is_err());
    }

    #[test]
    fn test_global_flags() {
        let args = PantryArgs::try_parse_from([
            "pantry",
            "clean-and-train",
            "--data-dir",
            "/tmp/pantry",
            "--config",
            "pantry.json",
            "-f",
            "json",
            "--pretty",
        ])
        .unwrap();

        assert!(matches!(args.command, Command::CleanAndTrain));
        assert_eq!(args.data_dir, Some(PathBuf::from("/tmp/pantry")));
        assert_eq!(args.config, Some(PathBuf::from("pantry.json")));
        assert_eq!(args.output_format, OutputFormat::Json);
        assert!(args.pretty);
    }

    #[test]
    fn test_verbosity_levels() {
        let args = PantryArgs::try_parse_from(["pantry", "stats"]).unwrap();
        assert_eq!(args.verbosity(), 1);

        let args = PantryArgs::try_parse_from(["pantry", "-v", "stats"]).unwrap();
        assert_eq!(args.verbosity(), 2);

        let args = PantryArgs::try_parse_from(["pantry", "-vv", "stats"]).unwrap();
        assert_eq!(args.verbosity(), 3);

        let args = PantryArgs::try_parse_from(["pantry", "-vv", "--quiet", "stats"]).unwrap();
        assert_eq!(args.verbosity(), 0);
    }
}
