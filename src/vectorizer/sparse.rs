use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// A sparse vector of `(term id, weight)` pairs with strictly ascending ids.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    indices: Vec<u32>,
    values: Vec<f32>,
}

impl SparseVector {
    /// Build a vector from pairs in any order. Repeated ids are summed and
    /// zero weights dropped.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (u32, f32)>,
    {
        let mut pairs: Vec<(u32, f32)> = pairs.into_iter().collect();
        pairs.sort_by_key(|&(index, _)| index);

        let mut indices = Vec::with_capacity(pairs.len());
        let mut values: Vec<f32> = Vec::with_capacity(pairs.len());
        for (index, value) in pairs {
            if indices.last() == Some(&index) {
                if let Some(last) = values.last_mut() {
                    *last += value;
                }
            } else {
                indices.push(index);
                values.push(value);
            }
        }

        let mut vector = SparseVector { indices, values };
        vector.retain_non_zero();
        vector
    }

    fn retain_non_zero(&mut self) {
        if self.values.iter().all(|&v| v != 0.0) {
            return;
        }
        let (indices, values) = self
            .indices
            .iter()
            .zip(&self.values)
            .filter(|&(_, &v)| v != 0.0)
            .map(|(&i, &v)| (i, v))
            .unzip();
        self.indices = indices;
        self.values = values;
    }

    /// Number of stored (non-zero) entries.
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, f32)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    /// Weight stored for `index`, zero when absent.
    pub fn get(&self, index: u32) -> f32 {
        self.indices
            .binary_search(&index)
            .map(|pos| self.values[pos])
            .unwrap_or(0.0)
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.values
            .iter()
            .map(|&v| (v as f64) * (v as f64))
            .sum::<f64>()
            .sqrt()
    }

    /// Scale the vector to unit length. The zero vector stays zero.
    pub fn l2_normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for value in &mut self.values {
                *value = (*value as f64 / norm) as f32;
            }
        }
    }

    /// Dot product, merging the two sorted index lists.
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0_f64;
        while i < self.indices.len() && j < other.indices.len() {
            match self.indices[i].cmp(&other.indices[j]) {
                Ordering::Equal => {
                    sum += self.values[i] as f64 * other.values[j] as f64;
                    i += 1;
                    j += 1;
                }
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
            }
        }
        sum
    }

    /// Cosine similarity. Zero when either vector is zero.
    pub fn cosine(&self, other: &SparseVector) -> f64 {
        let denominator = self.norm() * other.norm();
        if denominator == 0.0 {
            0.0
        } else {
            self.dot(other) / denominator
        }
    }

    /// Check the stored-form invariants against a vocabulary size:
    /// equal lengths, strictly ascending ids below `dimension`, finite weights.
    pub fn is_well_formed(&self, dimension: usize) -> bool {
        self.indices.len() == self.values.len()
            && self.indices.windows(2).all(|w| w[0] < w[1])
            && self.indices.last().is_none_or(|&last| (last as usize) < dimension)
            && self.values.iter().all(|v| v.is_finite())
    }
}
