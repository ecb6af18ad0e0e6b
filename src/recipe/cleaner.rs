//! Ingredient string cleaning.
//!
//! ```
//! use pantry::recipe::IngredientCleaner;
//!
//! let cleaner = IngredientCleaner::new();
//! assert_eq!(cleaner.clean_str("2 cups Tomatoes (fresh)"), Some("cups tomatoes".to_string()));
//! assert_eq!(cleaner.clean_str("1/2"), None);
//! ```

use std::sync::Arc;

use serde_json::Value;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::char_filter::ascii_folding::AsciiFoldingCharFilter;
use crate::analysis::char_filter::lowercase::LowercaseCharFilter;
use crate::analysis::char_filter::pattern_replace::PatternReplaceCharFilter;
use crate::analysis::tokenizer::whitespace::WhitespaceTokenizer;
use crate::error::Result;
use crate::recipe::raw::stringify;

/// Numeric quantities, including simple fractions.
const QUANTITY_PATTERN: &str = r"\d+(/\d+)?";
/// Parenthesized asides with their contents.
const ASIDE_PATTERN: &str = r"\([^)]*\)";
/// Anything that is neither a word character nor whitespace.
const PUNCTUATION_PATTERN: &str = r"[^\w\s]";

/// Normalizes one raw ingredient string into lowercase words separated by
/// single spaces.
///
/// Steps, in order: fold to ASCII, lowercase, drop quantities, drop
/// parenthesized asides, turn punctuation into spaces, collapse whitespace.
/// Cleaning is idempotent.
#[derive(Clone, Debug)]
pub struct IngredientCleaner {
    analyzer: PipelineAnalyzer,
}

impl IngredientCleaner {
    pub fn new() -> Self {
        Self::build().expect("Ingredient cleaning patterns should be valid")
    }

    fn build() -> Result<Self> {
        let analyzer = PipelineAnalyzer::new(Arc::new(WhitespaceTokenizer::new()))
            .add_char_filter(Arc::new(AsciiFoldingCharFilter::new()))
            .add_char_filter(Arc::new(LowercaseCharFilter::new()))
            .add_char_filter(Arc::new(PatternReplaceCharFilter::new(QUANTITY_PATTERN, "")?))
            .add_char_filter(Arc::new(PatternReplaceCharFilter::new(ASIDE_PATTERN, "")?))
            .add_char_filter(Arc::new(PatternReplaceCharFilter::new(
                PUNCTUATION_PATTERN,
                " ",
            )?))
            .with_name("ingredient_cleaner");

        Ok(IngredientCleaner { analyzer })
    }

    /// Clean a raw JSON ingredient entry.
    ///
    /// `null`, empty strings and entries that clean down to nothing yield
    /// `None`. Other scalars are stringified first.
    pub fn clean(&self, raw: Option<&Value>) -> Option<String> {
        match raw? {
            Value::Null => None,
            Value::String(s) => self.clean_str(s),
            other => self.clean_str(&stringify(other)),
        }
    }

    /// Clean a raw ingredient string.
    pub fn clean_str(&self, raw: &str) -> Option<String> {
        if raw.is_empty() {
            return None;
        }

        let words = self.analyzer.terms(raw).ok()?;
        if words.is_empty() {
            None
        } else {
            Some(words.join(" "))
        }
    }
}

impl Default for IngredientCleaner {
    fn default() -> Self {
        Self::new()
    }
}
