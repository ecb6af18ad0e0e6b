//! Tokenizer implementations for text analysis.
//!
//! Tokenizers split a (char-filtered) text into tokens.
//!
//! # Available Tokenizers
//!
//! - [`regex::RegexTokenizer`] - Extracts regex matches, `\b\w+\b` by default
//! - [`whitespace::WhitespaceTokenizer`] - Splits on whitespace characters
//!
//! # Examples
//!
//! ```
//! use pantry::analysis::tokenizer::Tokenizer;
//! use pantry::analysis::tokenizer::whitespace::WhitespaceTokenizer;
//!
//! let tokenizer = WhitespaceTokenizer::new();
//! let tokens: Vec<_> = tokenizer.tokenize("olive oil").unwrap().collect();
//! assert_eq!(tokens.len(), 2);
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for tokenizers that convert text into tokens.
///
/// # Examples
///
/// ```
/// use pantry::analysis::token::{Token, TokenStream};
/// use pantry::analysis::tokenizer::Tokenizer;
/// use pantry::error::Result;
///
/// struct CommaTokenizer;
///
/// impl Tokenizer for CommaTokenizer {
///     fn tokenize(&self, text: &str) -> Result<TokenStream> {
///         let tokens: Vec<Token> = text
///             .split(',')
///             .enumerate()
///             .map(|(i, s)| Token::new(s.trim(), i))
///             .collect();
///         Ok(Box::new(tokens.into_iter()))
///     }
///
///     fn name(&self) -> &'static str {
///         "comma"
///     }
/// }
/// ```
pub trait Tokenizer: Send + Sync {
    /// Tokenize the given text into a stream of tokens.
    fn tokenize(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this tokenizer.
    fn name(&self) -> &'static str;
}

pub mod regex;
pub mod whitespace;
