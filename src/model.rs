//! Scheme Classifier
//!
//! Nearest-centroid model over standardized feature vectors. Training
//! computes per-column mean and standard deviation plus one centroid per
//! scheme label; classification returns the label of the closest centroid
//! in squared Euclidean distance.
//!
//! The model is a consumer of feature vectors, not part of the extraction
//! pipeline. Anything implementing [`Classify`] can stand in for it.

use std::cmp::Ordering;
use std::fs;
use std::path::Path;

use anyhow::{bail, ensure, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::dataset::SchemeLabel;
use crate::features::{FeatureSchema, FeatureVector};
use crate::table::FeatureTable;

/// Anything that maps a feature vector to a scheme label
pub trait Classify {
    fn classify(&self, vector: &FeatureVector) -> SchemeLabel;
}

/// Nearest-centroid classifier with stored standardization parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemeClassifier {
    schema: FeatureSchema,
    means: Vec<f64>,
    stds: Vec<f64>,
    centroids: Vec<(SchemeLabel, Vec<f64>)>,
}

impl SchemeClassifier {
    /// Train on a labeled feature table
    ///
    /// Standardization parameters are computed over all rows regardless of
    /// label, then each label's centroid is the mean of its standardized
    /// rows. Unknown label strings are an error.
    pub fn train(table: &FeatureTable) -> Result<Self> {
        if table.is_empty() || table.labels().is_none() {
            bail!("training requires a non-empty labeled feature table");
        }

        let schema = table.schema().clone();
        let width = schema.len();
        let count = table.len() as f64;

        let mut means = vec![0.0; width];
        for row in table.rows() {
            for (m, v) in means.iter_mut().zip(row.values()) {
                *m += v;
            }
        }
        for m in &mut means {
            *m /= count;
        }

        let mut stds = vec![0.0; width];
        for row in table.rows() {
            for ((s, v), m) in stds.iter_mut().zip(row.values()).zip(&means) {
                let d = v - m;
                *s += d * d;
            }
        }
        for s in &mut stds {
            *s = (*s / count).sqrt();
        }

        let mut sums: Vec<(SchemeLabel, Vec<f64>, usize)> = SchemeLabel::ALL
            .iter()
            .map(|&label| (label, vec![0.0; width], 0))
            .collect();
        for (row, label) in table.labeled_rows() {
            let label: SchemeLabel = label.parse()?;
            let slot = sums
                .iter_mut()
                .find(|(l, _, _)| *l == label)
                .context("scheme label missing from centroid accumulator")?;
            for (acc, v) in slot.1.iter_mut().zip(standardize(row.values(), &means, &stds)) {
                *acc += v;
            }
            slot.2 += 1;
        }

        let centroids: Vec<(SchemeLabel, Vec<f64>)> = sums
            .into_iter()
            .filter(|(_, _, n)| *n > 0)
            .map(|(label, mut sum, n)| {
                for v in &mut sum {
                    *v /= n as f64;
                }
                (label, sum)
            })
            .collect();

        let model = Self {
            schema,
            means,
            stds,
            centroids,
        };
        model.validate()?;

        info!(
            rows = table.len(),
            centroids = model.centroids.len(),
            features = width,
            "trained scheme classifier"
        );
        Ok(model)
    }

    /// Schema the model was trained against
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Label of the nearest centroid
    pub fn classify(&self, vector: &FeatureVector) -> SchemeLabel {
        debug_assert_eq!(vector.len(), self.schema.len());
        let standardized = standardize(vector.values(), &self.means, &self.stds);

        self.centroids
            .iter()
            .map(|(label, centroid)| (*label, squared_distance(&standardized, centroid)))
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
            .map(|(label, _)| label)
            .unwrap_or(SchemeLabel::Plaintext)
    }

    /// Persist the model as JSON
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize model")?;
        fs::write(path, json)
            .with_context(|| format!("failed to write model file: {}", path.display()))?;
        Ok(())
    }

    /// Load a model from JSON, rejecting structurally invalid files
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read model file: {}", path.display()))?;
        let model: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse model file: {}", path.display()))?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<()> {
        let width = self.schema.len();
        ensure!(width > 0, "model schema is empty");
        ensure!(
            self.means.len() == width && self.stds.len() == width,
            "standardization parameters do not match the schema width"
        );
        ensure!(!self.centroids.is_empty(), "model has no centroids");
        for (label, centroid) in &self.centroids {
            ensure!(
                centroid.len() == width,
                "centroid for {label} does not match the schema width"
            );
        }
        Ok(())
    }
}

impl Classify for SchemeClassifier {
    fn classify(&self, vector: &FeatureVector) -> SchemeLabel {
        SchemeClassifier::classify(self, vector)
    }
}

/// Center and scale by the stored parameters; zero-variance columns map to 0
fn standardize(values: &[f64], means: &[f64], stds: &[f64]) -> Vec<f64> {
    values
        .iter()
        .zip(means)
        .zip(stds)
        .map(|((v, m), s)| if *s > 0.0 { (v - m) / s } else { 0.0 })
        .collect()
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}
