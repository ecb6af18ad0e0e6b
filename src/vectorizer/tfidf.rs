//! TF-IDF weighting over a frozen vocabulary.
//!
//! With the default [`VectorizerConfig`] a document is analyzed by the
//! `\b\w+\b` regex tokenizer after lowercasing, English stop words are
//! removed, raw term counts are weighted by the smoothed IDF
//! `ln((1 + n) / (1 + df)) + 1` and every vector is L2-normalized.
//!
//! # Examples
//!
//! ```
//! use pantry::vectorizer::{TfidfVectorizer, VectorizerConfig};
//!
//! let documents = vec!["salt pepper".to_string(), "salt sugar".to_string()];
//! let (vectorizer, vectors) =
//!     TfidfVectorizer::fit_transform(VectorizerConfig::default(), &documents).unwrap();
//!
//! assert_eq!(vectorizer.vocabulary().terms(), &["pepper", "salt", "sugar"]);
//! assert_eq!(vectors.len(), 2);
//!
//! let query = vectorizer.transform("pepper").unwrap();
//! assert!(query.cosine(&vectors[0]) > query.cosine(&vectors[1]));
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, OnceLock};

use ahash::AHashMap;
use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::Analyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::char_filter::lowercase::LowercaseCharFilter;
use crate::analysis::token_filter::stop::StopFilter;
use crate::analysis::tokenizer::regex::{DEFAULT_TOKEN_PATTERN, RegexTokenizer};
use crate::error::{PantryError, Result};
use crate::vectorizer::sparse::SparseVector;
use crate::vectorizer::vocabulary::Vocabulary;

/// Stop word list applied after tokenization.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopWords {
    #[default]
    English,
    None,
    Custom(Vec<String>),
}

/// Vector normalization applied after weighting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Norm {
    #[default]
    L2,
    None,
}

/// Configuration for [`TfidfVectorizer`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorizerConfig {
    /// Regex whose matches are the tokens.
    pub token_pattern: String,
    /// Lowercase the text before tokenizing.
    pub lowercase: bool,
    pub stop_words: StopWords,
    /// Add one to document frequencies as if an extra document held every term.
    pub smooth_idf: bool,
    /// Use `1 + ln(tf)` instead of the raw count.
    pub sublinear_tf: bool,
    pub norm: Norm,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        VectorizerConfig {
            token_pattern: DEFAULT_TOKEN_PATTERN.to_string(),
            lowercase: true,
            stop_words: StopWords::English,
            smooth_idf: true,
            sublinear_tf: false,
            norm: Norm::L2,
        }
    }
}

impl VectorizerConfig {
    /// Build the analysis pipeline described by this configuration.
    pub fn build_analyzer(&self) -> Result<PipelineAnalyzer> {
        let tokenizer = RegexTokenizer::with_pattern(&self.token_pattern)?;
        let mut analyzer = PipelineAnalyzer::new(Arc::new(tokenizer));

        if self.lowercase {
            analyzer = analyzer.add_char_filter(Arc::new(LowercaseCharFilter::new()));
        }

        match &self.stop_words {
            StopWords::English => {
                analyzer = analyzer.add_filter(Arc::new(StopFilter::new()));
            }
            StopWords::Custom(words) => {
                analyzer = analyzer.add_filter(Arc::new(StopFilter::from_words(words.clone())));
            }
            StopWords::None => {}
        }

        Ok(analyzer.with_name("tfidf"))
    }

    /// Reject configurations that cannot produce an analyzer.
    pub fn validate(&self) -> Result<()> {
        if self.token_pattern.is_empty() {
            return Err(PantryError::invalid_config("token_pattern must not be empty"));
        }
        self.build_analyzer()
            .map(|_| ())
            .map_err(|e| PantryError::invalid_config(format!("token_pattern: {e}")))
    }
}

/// A fitted TF-IDF vectorizer.
///
/// The vocabulary and IDF weights are frozen at fit time; terms unseen during
/// fitting contribute nothing to transformed vectors.
#[derive(Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    config: VectorizerConfig,
    vocabulary: Vocabulary,
    idf: Vec<f32>,
    #[serde(skip)]
    analyzer: OnceLock<PipelineAnalyzer>,
}

impl TfidfVectorizer {
    /// Fit on `documents` and return the vectorizer with one vector per
    /// document, in input order.
    ///
    /// Fails with [`PantryError::EmptyCorpus`] when there are no documents,
    /// when every document is blank, or when analysis leaves no terms.
    pub fn fit_transform(
        config: VectorizerConfig,
        documents: &[String],
    ) -> Result<(Self, Vec<SparseVector>)> {
        if documents.is_empty() {
            return Err(PantryError::empty_corpus("no documents to fit"));
        }
        if documents.iter().all(|doc| doc.trim().is_empty()) {
            return Err(PantryError::empty_corpus(
                "no valid ingredients found for training",
            ));
        }

        let analyzer = config.build_analyzer()?;
        let analyzed: Vec<Vec<String>> = documents
            .par_iter()
            .map(|doc| analyzer.terms(doc))
            .collect::<Result<_>>()?;

        let vocabulary = Vocabulary::from_terms(analyzed.iter().flatten().map(String::as_str));
        if vocabulary.is_empty() {
            return Err(PantryError::empty_corpus(
                "empty vocabulary; documents contain only stop words",
            ));
        }

        let mut document_frequency = vec![0_u32; vocabulary.len()];
        for terms in &analyzed {
            let unique: BTreeSet<u32> = terms.iter().filter_map(|t| vocabulary.get(t)).collect();
            for id in unique {
                document_frequency[id as usize] += 1;
            }
        }

        let n = documents.len() as f64;
        let idf: Vec<f32> = document_frequency
            .iter()
            .map(|&df| {
                let df = df as f64;
                let weight = if config.smooth_idf {
                    ((1.0 + n) / (1.0 + df)).ln() + 1.0
                } else {
                    (n / df).ln() + 1.0
                };
                weight as f32
            })
            .collect();

        debug!(
            "Fitted vocabulary of {} terms over {} documents",
            vocabulary.len(),
            documents.len()
        );

        let vectorizer = TfidfVectorizer {
            config,
            vocabulary,
            idf,
            analyzer: OnceLock::from(analyzer),
        };

        let vectors: Vec<SparseVector> = analyzed
            .par_iter()
            .map(|terms| vectorizer.weigh(terms))
            .collect();

        info!(
            "TF-IDF matrix shape: ({}, {})",
            vectors.len(),
            vectorizer.vocabulary.len()
        );

        Ok((vectorizer, vectors))
    }

    /// Project `text` onto the frozen vocabulary.
    pub fn transform(&self, text: &str) -> Result<SparseVector> {
        let terms = self.analyzer()?.terms(text)?;
        Ok(self.weigh(&terms))
    }

    /// Transform several texts, in parallel, keeping input order.
    pub fn transform_many(&self, texts: &[String]) -> Result<Vec<SparseVector>> {
        texts.par_iter().map(|text| self.transform(text)).collect()
    }

    fn weigh(&self, terms: &[String]) -> SparseVector {
        let mut counts: AHashMap<u32, u32> = AHashMap::new();
        for term in terms {
            if let Some(id) = self.vocabulary.get(term) {
                *counts.entry(id).or_insert(0) += 1;
            }
        }

        let sublinear = self.config.sublinear_tf;
        let mut vector = SparseVector::from_pairs(counts.into_iter().map(|(id, count)| {
            let tf = if sublinear {
                1.0 + (count as f32).ln()
            } else {
                count as f32
            };
            (id, tf * self.idf[id as usize])
        }));

        if self.config.norm == Norm::L2 {
            vector.l2_normalize();
        }
        vector
    }

    fn analyzer(&self) -> Result<&PipelineAnalyzer> {
        if let Some(analyzer) = self.analyzer.get() {
            return Ok(analyzer);
        }
        let built = self.config.build_analyzer()?;
        Ok(self.analyzer.get_or_init(|| built))
    }

    pub fn config(&self) -> &VectorizerConfig {
        &self.config
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// IDF weights in vocabulary order.
    pub fn idf(&self) -> &[f32] {
        &self.idf
    }

    /// IDF weight of a term, if it is in the vocabulary.
    pub fn idf_for(&self, term: &str) -> Option<f32> {
        self.vocabulary.get(term).map(|id| self.idf[id as usize])
    }

    /// Check that a deserialized vectorizer is usable.
    pub fn validate(&self) -> Result<()> {
        if self.vocabulary.is_empty() {
            return Err(PantryError::other("vectorizer has an empty vocabulary"));
        }
        if self.idf.len() != self.vocabulary.len() {
            return Err(PantryError::other(format!(
                "vectorizer has {} idf weights for {} terms",
                self.idf.len(),
                self.vocabulary.len()
            )));
        }
        if self.idf.iter().any(|w| !w.is_finite()) {
            return Err(PantryError::other("vectorizer has non-finite idf weights"));
        }
        self.analyzer().map(|_| ())
    }
}

impl fmt::Debug for TfidfVectorizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TfidfVectorizer")
            .field("config", &self.config)
            .field("vocabulary_size", &self.vocabulary.len())
            .finish()
    }
}
