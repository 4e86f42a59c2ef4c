//! Extractor Configuration Types
//!
//! Configuration for the feature extraction engine: normalization policy,
//! character pool, reference table sources, and the search bounds of the
//! periodic statistics. Dataset generation knobs live here too so the CLI
//! can drive the whole pipeline from one file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level extractor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ExtractorConfig {
    /// Normalization policy applied before any statistic
    #[serde(default)]
    pub normalize: NormalizeConfig,
    /// Character pool backing the frequency columns
    #[serde(default)]
    pub pool: PoolConfig,
    /// Reference table source for the digraph scores
    #[serde(default)]
    pub tables: TableConfig,
    /// Exclusive upper bound of the period search (MIC)
    #[serde(default = "default_max_period")]
    pub max_period: usize,
    /// Exclusive upper bound of the kappa lag search (MKA)
    #[serde(default = "default_max_kappa_lag")]
    pub max_kappa_lag: usize,
    /// Rank positions compared by the rank-displacement score (NOMOR)
    #[serde(default = "default_rank_window")]
    pub rank_window: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            normalize: NormalizeConfig::default(),
            pool: PoolConfig::default(),
            tables: TableConfig::default(),
            max_period: 16,
            max_kappa_lag: 16,
            rank_window: 20,
        }
    }
}

impl ExtractorConfig {
    /// Load configuration from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }
}

/// Normalization policy
///
/// Case folding to uppercase is unconditional; whitespace removal is a
/// knob because corpora disagree on whether spaces are signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NormalizeConfig {
    /// Remove all whitespace during normalization
    #[serde(default = "default_true")]
    pub strip_whitespace: bool,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            strip_whitespace: true,
        }
    }
}

/// Character pool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PoolConfig {
    /// Characters tracked by the frequency columns, in column order
    #[serde(default = "default_charset")]
    pub charset: String,
    /// Append the space character to the pool
    #[serde(default)]
    pub include_space: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            charset: default_charset(),
            include_space: false,
        }
    }
}

/// Reference table source
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TableConfig {
    /// JSON file carrying the log-digraph and single-digraph matrices;
    /// the embedded defaults apply when absent
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Dataset generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DatasetConfig {
    /// Caesar shift applied to the Caesar track
    #[serde(default = "default_caesar_shift")]
    pub caesar_shift: u8,
    /// Truncate each sentence to this many characters before encryption
    #[serde(default = "default_truncate_len")]
    pub truncate_len: usize,
    /// RNG seed for reproducible keys; entropy-seeded when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            caesar_shift: 3,
            truncate_len: 100,
            seed: None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_period() -> usize {
    16
}

fn default_max_kappa_lag() -> usize {
    16
}

fn default_rank_window() -> usize {
    20
}

fn default_charset() -> String {
    let mut charset: String = ('A'..='Z').collect();
    charset.extend('0'..='9');
    charset.push_str(crate::pool::ASCII_PUNCTUATION);
    charset
}

fn default_caesar_shift() -> u8 {
    3
}

fn default_truncate_len() -> usize {
    100
}
