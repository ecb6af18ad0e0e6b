//! The trained vector space model and its on-disk artifact.

pub mod artifact;
pub mod trainer;

use chrono::{DateTime, Utc};

use crate::error::{PantryError, Result};
use crate::recipe::CleanedRecipe;
use crate::vectorizer::{SparseVector, TfidfVectorizer};

pub use artifact::{ArtifactInfo, load_model, load_model_with_info, read_artifact_info, save_model};
pub use trainer::{VectorSpaceTrainer, train};

/// A fitted vectorizer plus one vector per recipe.
///
/// `corpus_vectors[i]` is the vector of `recipes[i]`; the constructor refuses
/// anything else.
#[derive(Clone, Debug)]
pub struct VectorSpaceModel {
    vectorizer: TfidfVectorizer,
    corpus_vectors: Vec<SparseVector>,
    recipes: Vec<CleanedRecipe>,
    created_at: DateTime<Utc>,
}

impl VectorSpaceModel {
    pub fn new(
        vectorizer: TfidfVectorizer,
        corpus_vectors: Vec<SparseVector>,
        recipes: Vec<CleanedRecipe>,
    ) -> Result<Self> {
        if corpus_vectors.len() != recipes.len() {
            return Err(PantryError::other(format!(
                "{} corpus vectors for {} recipes",
                corpus_vectors.len(),
                recipes.len()
            )));
        }

        let dimension = vectorizer.vocabulary().len();
        if let Some(row) = corpus_vectors
            .iter()
            .position(|v| !v.is_well_formed(dimension))
        {
            return Err(PantryError::other(format!(
                "corpus vector {row} does not fit a vocabulary of {dimension} terms"
            )));
        }

        Ok(VectorSpaceModel {
            vectorizer,
            corpus_vectors,
            recipes,
            created_at: Utc::now(),
        })
    }

    /// Override the creation time, as recorded in a stored artifact.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    pub fn corpus_vectors(&self) -> &[SparseVector] {
        &self.corpus_vectors
    }

    pub fn recipes(&self) -> &[CleanedRecipe] {
        &self.recipes
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Number of recipes.
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vectorizer.vocabulary().len()
    }

    /// `(recipes, vocabulary terms)`: the shape of the TF-IDF matrix.
    pub fn shape(&self) -> (usize, usize) {
        (self.len(), self.vocabulary_size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorizer::VectorizerConfig;

    fn fitted() -> (TfidfVectorizer, Vec<SparseVector>, Vec<CleanedRecipe>) {
        let recipes = vec![
            CleanedRecipe::new("Pesto", vec!["basil".to_string(), "pine nuts".to_string()]),
            CleanedRecipe::new("Caprese", vec!["basil".to_string(), "tomato".to_string()]),
        ];
        let documents: Vec<String> = recipes.iter().map(|r| r.ingredient_text()).collect();
        let (vectorizer, vectors) =
            TfidfVectorizer::fit_transform(VectorizerConfig::default(), &documents).unwrap();
        (vectorizer, vectors, recipes)
    }

    #[test]
    fn test_shape() {
        let (vectorizer, vectors, recipes) = fitted();
        let model = VectorSpaceModel::new(vectorizer, vectors, recipes).unwrap();
        assert_eq!(model.shape(), (2, 4));
        assert_eq!(model.len(), 2);
        assert_eq!(model.corpus_vectors().len(), model.recipes().len());
    }

    #[test]
    fn test_misaligned_rejected() {
        let (vectorizer, mut vectors, recipes) = fitted();
        vectors.pop();
        let err = VectorSpaceModel::new(vectorizer, vectors, recipes).unwrap_err();
        assert_eq!(err.to_string(), "Error: 1 corpus vectors for 2 recipes");
    }

    #[test]
    fn test_out_of_vocabulary_vector_rejected() {
        let (vectorizer, mut vectors, recipes) = fitted();
        vectors[1] = SparseVector::from_pairs([(99, 1.0)]);
        assert!(VectorSpaceModel::new(vectorizer, vectors, recipes).is_err());
    }
}
