//! Text analysis for ingredient cleaning and TF-IDF term extraction.
//!
//! Char filters normalize raw text, tokenizers split it and token filters
//! transform the resulting stream. [`analyzer::pipeline::PipelineAnalyzer`]
//! chains all three.

pub mod analyzer;
pub mod char_filter;
pub mod token;
pub mod token_filter;
pub mod tokenizer;
