//! TF-IDF vectorization of ingredient text.
//!
//! - [`vocabulary::Vocabulary`]: the sorted, frozen term list
//! - [`sparse::SparseVector`]: sorted `(term id, weight)` pairs with cosine similarity
//! - [`tfidf::TfidfVectorizer`]: fits IDF weights over a corpus and projects text on them

pub mod sparse;
pub mod tfidf;
pub mod vocabulary;

pub use sparse::SparseVector;
pub use tfidf::{Norm, StopWords, TfidfVectorizer, VectorizerConfig};
pub use vocabulary::Vocabulary;
