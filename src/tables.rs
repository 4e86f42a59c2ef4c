//! Reference Tables
//!
//! English letter frequencies, the frequency rank order they induce, and
//! the digraph score matrices consumed by the table-driven statistics.
//! The letter table is fixed. The digraph matrices default to zero and
//! can be replaced from a JSON file at engine construction; whichever
//! matrices end up in use must be finite, anything else is fatal.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::config::TableConfig;

/// Number of letters tracked by the letter statistics
pub const ALPHABET_LEN: usize = 26;

/// Relative frequencies of A-Z in English text
const ENGLISH_LETTER_FREQ: [f64; ALPHABET_LEN] = [
    0.08167, 0.01492, 0.02782, 0.04253, 0.12702, 0.02228, 0.02015, 0.06094, 0.06966, 0.00153,
    0.00772, 0.04025, 0.02406, 0.06749, 0.07507, 0.01929, 0.00095, 0.05987, 0.06327, 0.09056,
    0.07258, 0.00978, 0.02360, 0.00150, 0.01974, 0.00074,
];

/// Reference data for the table-driven statistics
#[derive(Debug, Clone)]
pub struct ReferenceTables {
    /// Log-digraph score matrix, indexed [first][second]
    pub log_digraph: [[f64; ALPHABET_LEN]; ALPHABET_LEN],
    /// Single-digraph discriminant matrix, indexed [first][second]
    pub single_digraph: [[f64; ALPHABET_LEN]; ALPHABET_LEN],
    english_rank_order: [usize; ALPHABET_LEN],
}

impl Default for ReferenceTables {
    fn default() -> Self {
        Self {
            log_digraph: [[0.0; ALPHABET_LEN]; ALPHABET_LEN],
            single_digraph: [[0.0; ALPHABET_LEN]; ALPHABET_LEN],
            english_rank_order: induced_rank_order(),
        }
    }
}

impl ReferenceTables {
    /// Build tables from configuration, loading the digraph matrices from
    /// the configured JSON file when present
    pub fn from_config(config: &TableConfig) -> Result<Self> {
        let mut tables = Self::default();
        if let Some(path) = &config.path {
            let file = DigraphTableFile::load(path)?;
            tables.log_digraph = file.log_digraph;
            tables.single_digraph = file.single_digraph;
        }
        tables.validate()?;
        Ok(tables)
    }

    /// Tables with explicit digraph matrices
    pub fn with_digraphs(
        log_digraph: [[f64; ALPHABET_LEN]; ALPHABET_LEN],
        single_digraph: [[f64; ALPHABET_LEN]; ALPHABET_LEN],
    ) -> Self {
        Self {
            log_digraph,
            single_digraph,
            english_rank_order: induced_rank_order(),
        }
    }

    /// English relative frequency of the letter at `index` (0 = A)
    pub fn letter_frequency(&self, index: usize) -> f64 {
        ENGLISH_LETTER_FREQ[index]
    }

    /// Letter indices 0..26 ordered by descending English frequency
    pub fn english_rank_order(&self) -> &[usize; ALPHABET_LEN] {
        &self.english_rank_order
    }

    /// Reject non-finite matrix entries
    pub fn validate(&self) -> Result<()> {
        for (name, matrix) in [
            ("log-digraph", &self.log_digraph),
            ("single-digraph", &self.single_digraph),
        ] {
            for row in matrix.iter() {
                for &value in row {
                    if !value.is_finite() {
                        bail!("{name} table contains a non-finite entry: {value}");
                    }
                }
            }
        }
        Ok(())
    }
}

/// Rank letters by the embedded frequency table; ties break toward the
/// alphabetically earlier letter so the order is deterministic
fn induced_rank_order() -> [usize; ALPHABET_LEN] {
    let mut order: [usize; ALPHABET_LEN] = std::array::from_fn(|i| i);
    order.sort_by(|&a, &b| {
        ENGLISH_LETTER_FREQ[b]
            .partial_cmp(&ENGLISH_LETTER_FREQ[a])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });
    order
}

/// On-disk digraph table format; the fixed-size arrays make serde reject
/// any shape other than 26x26
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct DigraphTableFile {
    log_digraph: [[f64; ALPHABET_LEN]; ALPHABET_LEN],
    single_digraph: [[f64; ALPHABET_LEN]; ALPHABET_LEN],
}

impl DigraphTableFile {
    fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read digraph table file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse digraph table file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_letter_frequencies_sum_to_one() {
        let total: f64 = ENGLISH_LETTER_FREQ.iter().sum();
        assert!((total - 1.0).abs() < 0.06, "total {total}");
    }

    #[test]
    fn test_induced_rank_order_head() {
        let tables = ReferenceTables::default();
        let order = tables.english_rank_order();
        // E, T, A, O lead under the embedded table
        assert_eq!(order[0], 4);
        assert_eq!(order[1], 19);
        assert_eq!(order[2], 0);
        assert_eq!(order[3], 14);
        // Z trails
        assert_eq!(order[25], 25);
    }

    #[test]
    fn test_induced_rank_order_is_a_permutation() {
        let tables = ReferenceTables::default();
        let mut seen = [false; ALPHABET_LEN];
        for &i in tables.english_rank_order() {
            assert!(!seen[i]);
            seen[i] = true;
        }
    }

    #[test]
    fn test_default_digraphs_are_zero() {
        let tables = ReferenceTables::default();
        assert_eq!(tables.log_digraph[0][0], 0.0);
        assert_eq!(tables.single_digraph[25][25], 0.0);
        tables.validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_non_finite() {
        let mut tables = ReferenceTables::default();
        tables.log_digraph[3][7] = f64::NAN;
        assert!(tables.validate().is_err());

        let mut tables = ReferenceTables::default();
        tables.single_digraph[0][0] = f64::INFINITY;
        assert!(tables.validate().is_err());
    }

    #[test]
    fn test_from_config_without_path() {
        let tables = ReferenceTables::from_config(&TableConfig::default()).unwrap();
        assert_eq!(tables.log_digraph[0][0], 0.0);
    }

    #[test]
    fn test_from_config_with_file() {
        let mut log = vec![vec![0.0f64; ALPHABET_LEN]; ALPHABET_LEN];
        log[0][1] = 2.5;
        let single = vec![vec![1.0f64; ALPHABET_LEN]; ALPHABET_LEN];
        let json = serde_json::json!({
            "log-digraph": log,
            "single-digraph": single,
        });

        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{json}").unwrap();
        file.flush().unwrap();

        let tables = ReferenceTables::from_config(&TableConfig {
            path: Some(file.path().to_path_buf()),
        })
        .unwrap();
        assert_eq!(tables.log_digraph[0][1], 2.5);
        assert_eq!(tables.single_digraph[10][10], 1.0);
    }

    #[test]
    fn test_from_config_rejects_bad_shape() {
        let json = serde_json::json!({
            "log-digraph": [[1.0, 2.0]],
            "single-digraph": [[1.0, 2.0]],
        });
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{json}").unwrap();
        file.flush().unwrap();

        let result = ReferenceTables::from_config(&TableConfig {
            path: Some(file.path().to_path_buf()),
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_from_config_missing_file() {
        let result = ReferenceTables::from_config(&TableConfig {
            path: Some(Path::new("/nonexistent/tables.json").to_path_buf()),
        });
        assert!(result.is_err());
    }
}
