//! Feature Schema and Vectors
//!
//! The fixed column layout shared by every extracted vector: one
//! `freq_<char>` column per pool character in pool order, then the scalar
//! block in a fixed, documented order. The schema is immutable after
//! engine construction and shared behind an Arc so batch rows stay cheap
//! to produce.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::pool::CharPool;

/// Names of the scalar features, in output order
pub const SCALAR_FEATURES: [&str; 25] = [
    "length",
    "unique_chars",
    "entropy",
    "ascii_mean",
    "ascii_std",
    "ascii_min",
    "ascii_max",
    "digit_ratio",
    "alpha_ratio",
    "symbol_ratio",
    "equals_count",
    "plus_count",
    "slash_count",
    "equals_ratio",
    "ic",
    "mic",
    "mka",
    "dic",
    "edi",
    "lr",
    "ldi",
    "sdd",
    "nomor",
    "rdi",
    "chi_square",
];

/// Immutable column layout of the feature vectors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    names: Vec<String>,
}

impl FeatureSchema {
    /// Derive the schema from a character pool
    pub fn from_pool(pool: &CharPool) -> Self {
        let mut names = Vec::with_capacity(pool.len() + SCALAR_FEATURES.len());
        for &c in pool.chars() {
            names.push(format!("freq_{c}"));
        }
        names.extend(SCALAR_FEATURES.iter().map(|s| s.to_string()));
        Self { names }
    }

    /// Column names in output order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Column index of a feature name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }
}

/// One extracted feature vector, ordered per its schema
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    schema: Arc<FeatureSchema>,
    values: Vec<f64>,
}

impl FeatureVector {
    /// Pair values with their schema; lengths must agree
    pub(crate) fn new(schema: Arc<FeatureSchema>, values: Vec<f64>) -> Self {
        debug_assert_eq!(schema.len(), values.len());
        Self { schema, values }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Values in schema order
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of a named feature
    pub fn get(&self, name: &str) -> Option<f64> {
        self.schema.index_of(name).map(|i| self.values[i])
    }

    /// (name, value) pairs in schema order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.schema
            .names()
            .iter()
            .map(|n| n.as_str())
            .zip(self.values.iter().copied())
    }
}
