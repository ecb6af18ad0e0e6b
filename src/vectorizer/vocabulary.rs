use std::collections::BTreeSet;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// The frozen term list of a fitted vectorizer.
///
/// Terms are sorted, and a term's id is its position in that order. Only the
/// term list is serialized; the lookup index is rebuilt on load.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Vocabulary {
    terms: Vec<String>,
    index: AHashMap<String, u32>,
}

impl Vocabulary {
    /// Build a vocabulary from any collection of terms. Duplicates collapse.
    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let sorted: BTreeSet<String> = terms.into_iter().map(Into::into).collect();
        Self::from(sorted.into_iter().collect::<Vec<_>>())
    }

    /// Id of a term, if it is in the vocabulary.
    pub fn get(&self, term: &str) -> Option<u32> {
        self.index.get(term).copied()
    }

    /// Term for an id.
    pub fn term(&self, id: u32) -> Option<&str> {
        self.terms.get(id as usize).map(String::as_str)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.index.contains_key(term)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// All terms in id order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}

impl From<Vec<String>> for Vocabulary {
    fn from(mut terms: Vec<String>) -> Self {
        // Stored vocabularies are already sorted; this keeps ids stable for any input.
        terms.sort_unstable();
        terms.dedup();
        let index = terms
            .iter()
            .enumerate()
            .map(|(id, term)| (term.clone(), id as u32))
            .collect();
        Vocabulary { terms, index }
    }
}

impl From<Vocabulary> for Vec<String> {
    fn from(vocabulary: Vocabulary) -> Self {
        vocabulary.terms
    }
}

impl PartialEq for Vocabulary {
    fn eq(&self, other: &Self) -> bool {
        self.terms == other.terms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_ids() {
        let vocabulary = Vocabulary::from_terms(["salt", "garlic", "pepper", "salt"]);
        assert_eq!(vocabulary.len(), 3);
        assert_eq!(vocabulary.terms(), &["garlic", "pepper", "salt"]);
        assert_eq!(vocabulary.get("garlic"), Some(0));
        assert_eq!(vocabulary.get("salt"), Some(2));
        assert_eq!(vocabulary.get("cumin"), None);
        assert_eq!(vocabulary.term(1), Some("pepper"));
        assert_eq!(vocabulary.term(3), None);
        assert!(vocabulary.contains("pepper"));
    }

    #[test]
    fn test_serde_rebuilds_index() {
        let vocabulary = Vocabulary::from_terms(["onion", "butter"]);
        let json = serde_json::to_string(&vocabulary).unwrap();
        assert_eq!(json, r#"["butter","onion"]"#);

        let restored: Vocabulary = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, vocabulary);
        assert_eq!(restored.get("onion"), Some(1));
    }

    #[test]
    fn test_empty() {
        let vocabulary = Vocabulary::default();
        assert!(vocabulary.is_empty());
        assert_eq!(vocabulary.get("salt"), None);
    }
}
