use log::info;

use crate::error::{PantryError, Result};
use crate::model::VectorSpaceModel;
use crate::recipe::CleanedRecipe;
use crate::vectorizer::{TfidfVectorizer, VectorizerConfig};

/// Fits a [`TfidfVectorizer`] over cleaned recipes.
#[derive(Clone, Debug, Default)]
pub struct VectorSpaceTrainer {
    config: VectorizerConfig,
}

impl VectorSpaceTrainer {
    pub fn new(config: VectorizerConfig) -> Self {
        VectorSpaceTrainer { config }
    }

    pub fn config(&self) -> &VectorizerConfig {
        &self.config
    }

    /// Build the model. One document per recipe: its ingredients joined by a space.
    pub fn train(&self, recipes: Vec<CleanedRecipe>) -> Result<VectorSpaceModel> {
        if recipes.is_empty() {
            return Err(PantryError::empty_corpus(
                "no cleaned recipes available for training",
            ));
        }

        let documents: Vec<String> = recipes.iter().map(CleanedRecipe::ingredient_text).collect();
        info!("Training on {} recipes", documents.len());

        let (vectorizer, corpus_vectors) =
            TfidfVectorizer::fit_transform(self.config.clone(), &documents)?;
        let model = VectorSpaceModel::new(vectorizer, corpus_vectors, recipes)?;

        let (rows, columns) = model.shape();
        info!("Vocabulary size: {columns}");
        info!("Feature matrix shape: ({rows}, {columns})");
        Ok(model)
    }
}

/// Train with the default vectorizer configuration.
pub fn train(recipes: Vec<CleanedRecipe>) -> Result<VectorSpaceModel> {
    VectorSpaceTrainer::default().train(recipes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(name: &str, ingredients: &[&str]) -> CleanedRecipe {
        CleanedRecipe::new(name, ingredients.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_train_aligns_vectors() {
        let model = train(vec![
            recipe("Omelette", &["eggs", "butter", "chives"]),
            recipe("Pancakes", &["flour", "eggs", "milk"]),
            recipe("Toast", &["bread", "butter"]),
        ])
        .unwrap();

        assert_eq!(model.len(), 3);
        assert_eq!(model.corpus_vectors().len(), 3);
        assert_eq!(model.vocabulary_size(), 6);
        assert_eq!(model.recipes()[1].name, "Pancakes");
    }

    #[test]
    fn test_empty_corpus() {
        assert!(matches!(train(Vec::new()), Err(PantryError::EmptyCorpus(_))));
        assert!(matches!(
            train(vec![recipe("Filler", &["the", "and"])]),
            Err(PantryError::EmptyCorpus(_))
        ));
    }
}
