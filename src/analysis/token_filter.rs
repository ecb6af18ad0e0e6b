//! Token filter implementations for token transformation.
//!
//! # Available Filters
//!
//! - [`stop::StopFilter`] - Removes stop words
//!
//! Lowercasing happens before tokenization, in
//! [`LowercaseCharFilter`](crate::analysis::char_filter::lowercase::LowercaseCharFilter).
//!
//! # Examples
//!
//! ```
//! use pantry::analysis::token_filter::Filter;
//! use pantry::analysis::token_filter::stop::StopFilter;
//! use pantry::analysis::token::Token;
//!
//! let filter = StopFilter::from_words(["cup"]);
//! let tokens = vec![Token::new("cup", 0), Token::new("basil", 1)];
//! let filtered: Vec<_> = filter.filter(Box::new(tokens.into_iter()))
//!     .unwrap()
//!     .collect();
//!
//! assert_eq!(filtered.len(), 1);
//! assert_eq!(filtered[0].text, "basil");
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for filters that transform token streams.
pub trait Filter: Send + Sync {
    /// Apply this filter to a token stream.
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream>;

    /// Get the name of this filter.
    fn name(&self) -> &'static str;
}

pub mod stop;
