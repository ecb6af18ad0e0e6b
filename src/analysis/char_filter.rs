//! Char filter implementations for text normalization.
//!
//! Char filters pre-process the whole text string before it is passed to the
//! tokenizer. The ingredient cleaner is built almost entirely out of them.
//!
//! # Available Filters
//!
//! - [`ascii_folding::AsciiFoldingCharFilter`] - Folds accents and drops non-ASCII characters
//! - [`lowercase::LowercaseCharFilter`] - Lowercases the whole text
//! - [`pattern_replace::PatternReplaceCharFilter`] - Regex-based replacement
//!
//! # Examples
//!
//! ```
//! use pantry::analysis::char_filter::CharFilter;
//! use pantry::analysis::char_filter::pattern_replace::PatternReplaceCharFilter;
//!
//! let filter = PatternReplaceCharFilter::new(r"\([^)]*\)", "").unwrap();
//! assert_eq!(filter.filter("tomatoes (fresh)"), "tomatoes ");
//! ```

/// Trait for character filters that transform text before tokenization.
pub trait CharFilter: Send + Sync {
    /// Apply this filter to the input text.
    fn filter(&self, input: &str) -> String;

    /// Get the name of this char filter.
    fn name(&self) -> &'static str;
}

pub mod ascii_folding;
pub mod lowercase;
pub mod pattern_replace;
