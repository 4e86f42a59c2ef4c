//! Feature Extraction Engine
//!
//! Turns raw strings into fixed-order numeric feature vectors. The engine
//! is immutable after construction: normalization policy, character pool,
//! reference tables and schema are validated once, then shared across
//! threads for batch work. Extraction itself is a total function; only
//! construction can fail.

use std::sync::Arc;

use anyhow::{ensure, Context, Result};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use tracing::info;

use crate::config::ExtractorConfig;
use crate::features::{FeatureSchema, FeatureVector};
use crate::normalize::Normalizer;
use crate::pool::CharPool;
use crate::stats::{cryptanalysis, primitive};
use crate::table::FeatureTable;
use crate::tables::{ReferenceTables, ALPHABET_LEN};

/// Feature extraction engine
pub struct FeatureExtractor {
    normalizer: Normalizer,
    pool: CharPool,
    tables: ReferenceTables,
    schema: Arc<FeatureSchema>,
    max_period: usize,
    max_kappa_lag: usize,
    rank_window: usize,
}

impl FeatureExtractor {
    /// Create an engine from configuration
    ///
    /// Fails on an empty pool, an unreadable or malformed digraph table
    /// file, non-finite table entries, or out-of-range search bounds.
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        ensure!(config.max_period >= 2, "max-period must be at least 2");
        ensure!(config.max_kappa_lag >= 2, "max-kappa-lag must be at least 2");
        ensure!(
            (1..=ALPHABET_LEN).contains(&config.rank_window),
            "rank-window must be between 1 and {ALPHABET_LEN}"
        );

        let normalizer = Normalizer::new(&config.normalize);
        let pool = CharPool::new(&config.pool).context("invalid character pool")?;
        let tables =
            ReferenceTables::from_config(&config.tables).context("invalid reference tables")?;
        let schema = Arc::new(FeatureSchema::from_pool(&pool));

        info!(
            pool_size = pool.len(),
            feature_count = schema.len(),
            strip_whitespace = normalizer.strips_whitespace(),
            max_period = config.max_period,
            max_kappa_lag = config.max_kappa_lag,
            rank_window = config.rank_window,
            "feature extractor initialized"
        );

        Ok(Self {
            normalizer,
            pool,
            tables,
            schema,
            max_period: config.max_period,
            max_kappa_lag: config.max_kappa_lag,
            rank_window: config.rank_window,
        })
    }

    /// The schema shared by every vector this engine produces
    pub fn schema(&self) -> &Arc<FeatureSchema> {
        &self.schema
    }

    /// Extract the feature vector for one input string
    ///
    /// Total: degenerate inputs produce the documented numeric defaults,
    /// and the schema is identical for every input including the empty
    /// string.
    pub fn extract(&self, text: &str) -> FeatureVector {
        let normalized = self.normalizer.apply(text);
        let chars: Vec<char> = normalized.chars().collect();
        let len = chars.len();

        let mut values = Vec::with_capacity(self.schema.len());

        // Frequency columns, pool order
        let mut counts: FxHashMap<char, u64> = FxHashMap::default();
        for &c in &chars {
            *counts.entry(c).or_insert(0) += 1;
        }
        let denom = len.max(1) as f64;
        for &c in self.pool.chars() {
            let count = counts.get(&c).copied().unwrap_or(0);
            values.push(count as f64 / denom);
        }

        // Scalar block, schema order
        values.push(len as f64);
        values.push(primitive::unique_chars(&normalized) as f64);
        values.push(primitive::shannon_entropy(&normalized));

        let ascii = primitive::ascii_stats(&normalized);
        values.extend([ascii.mean, ascii.std, ascii.min, ascii.max]);

        let ratios = primitive::char_class_ratios(&normalized);
        values.extend([ratios.digit, ratios.alpha, ratios.symbol]);

        let markers = primitive::base64_markers(&normalized);
        values.extend([
            markers.equals_count as f64,
            markers.plus_count as f64,
            markers.slash_count as f64,
            markers.equals_ratio,
        ]);

        values.push(cryptanalysis::index_of_coincidence(&chars));
        values.push(cryptanalysis::max_periodic_ic(&chars, self.max_period));
        values.push(cryptanalysis::max_kappa(&chars, self.max_kappa_lag));
        values.push(cryptanalysis::digraphic_ic(&chars));
        values.push(cryptanalysis::even_digraphic_ic(&chars));
        values.push(cryptanalysis::long_repeat(&chars));
        values.push(cryptanalysis::log_digraph_score(&chars, &self.tables));
        values.push(cryptanalysis::single_digraph_score(&chars, &self.tables));
        values.push(cryptanalysis::rank_displacement(
            &chars,
            &self.tables,
            self.rank_window,
        ));
        values.push(cryptanalysis::reverse_log_digraph_score(&chars, &self.tables));
        values.push(cryptanalysis::chi_square(&chars, &self.tables));

        FeatureVector::new(Arc::clone(&self.schema), values)
    }

    /// Extract vectors for a batch of inputs in parallel
    ///
    /// Output order matches input order.
    pub fn extract_batch<S>(&self, texts: &[S]) -> Vec<FeatureVector>
    where
        S: AsRef<str> + Sync,
    {
        texts.par_iter().map(|t| self.extract(t.as_ref())).collect()
    }

    /// Extract an unlabeled feature table
    pub fn extract_table<S>(&self, texts: &[S]) -> FeatureTable
    where
        S: AsRef<str> + Sync,
    {
        FeatureTable::new(Arc::clone(&self.schema), self.extract_batch(texts))
    }

    /// Extract a labeled feature table; labels pass through untouched
    pub fn extract_labeled(&self, records: &[(String, String)]) -> FeatureTable {
        let rows: Vec<FeatureVector> = records
            .par_iter()
            .map(|(text, _)| self.extract(text))
            .collect();
        let labels: Vec<String> = records.iter().map(|(_, label)| label.clone()).collect();
        FeatureTable::labeled(Arc::clone(&self.schema), rows, labels)
    }
}
