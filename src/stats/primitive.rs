//! Primitive String Statistics
//!
//! Statistics that need no cryptanalytic context: Shannon entropy, code
//! point summary, character class ratios, and the marker characters that
//! give away base64 payloads.

use rustc_hash::{FxHashMap, FxHashSet};

/// Code point summary statistics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AsciiStats {
    pub mean: f64,
    /// Population standard deviation
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

/// Character class ratios; for non-empty text the three classes partition
/// it and sum to 1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharClassRatios {
    pub digit: f64,
    pub alpha: f64,
    pub symbol: f64,
}

/// Counts of the characters that distinguish base64 payloads
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Base64Markers {
    pub equals_count: usize,
    pub plus_count: usize,
    pub slash_count: usize,
    pub equals_ratio: f64,
}

/// Shannon entropy in bits over the distinct characters of `text`
///
/// 0.0 for the empty string and for a single repeated character.
pub fn shannon_entropy(text: &str) -> f64 {
    let mut counts: FxHashMap<char, usize> = FxHashMap::default();
    let mut len = 0usize;
    for c in text.chars() {
        *counts.entry(c).or_insert(0) += 1;
        len += 1;
    }
    if len == 0 {
        return 0.0;
    }
    let len = len as f64;
    counts
        .values()
        .map(|&n| {
            let p = n as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Mean, population standard deviation, min and max of the code points
///
/// All zero for the empty string.
pub fn ascii_stats(text: &str) -> AsciiStats {
    let values: Vec<f64> = text.chars().map(|c| c as u32 as f64).collect();
    if values.is_empty() {
        return AsciiStats {
            mean: 0.0,
            std: 0.0,
            min: 0.0,
            max: 0.0,
        };
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    AsciiStats {
        mean,
        std: variance.sqrt(),
        min,
        max,
    }
}

/// Fraction of characters that are digits, alphabetic, or neither
///
/// The empty string maps to all-zero ratios.
pub fn char_class_ratios(text: &str) -> CharClassRatios {
    let mut digits = 0usize;
    let mut alphas = 0usize;
    let mut symbols = 0usize;
    let mut total = 0usize;
    for c in text.chars() {
        total += 1;
        if c.is_numeric() {
            digits += 1;
        }
        if c.is_alphabetic() {
            alphas += 1;
        }
        if !c.is_alphanumeric() {
            symbols += 1;
        }
    }
    let denom = total.max(1) as f64;
    CharClassRatios {
        digit: digits as f64 / denom,
        alpha: alphas as f64 / denom,
        symbol: symbols as f64 / denom,
    }
}

/// Occurrence counts of '=', '+', '/' and the padding ratio
pub fn base64_markers(text: &str) -> Base64Markers {
    let mut equals = 0usize;
    let mut plus = 0usize;
    let mut slash = 0usize;
    let mut total = 0usize;
    for c in text.chars() {
        total += 1;
        match c {
            '=' => equals += 1,
            '+' => plus += 1,
            '/' => slash += 1,
            _ => {}
        }
    }
    Base64Markers {
        equals_count: equals,
        plus_count: plus,
        slash_count: slash,
        equals_ratio: equals as f64 / total.max(1) as f64,
    }
}

/// Number of distinct characters
pub fn unique_chars(text: &str) -> usize {
    text.chars().collect::<FxHashSet<char>>().len()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    #[test]
    fn test_entropy_empty_and_constant() {
        assert_eq!(shannon_entropy(""), 0.0);
        assert!(shannon_entropy("AAAA").abs() < TOL);
    }

    #[test]
    fn test_entropy_two_equiprobable_chars() {
        // Two symbols at p = 0.5 each carry exactly one bit
        assert!((shannon_entropy("ABAB") - 1.0).abs() < TOL);
    }

    #[test]
    fn test_entropy_four_distinct() {
        assert!((shannon_entropy("ABCD") - 2.0).abs() < TOL);
    }

    #[test]
    fn test_entropy_nonnegative() {
        for text in ["", "A", "hello", "==//++", "Z9!"] {
            assert!(shannon_entropy(text) >= 0.0, "entropy of {text:?}");
        }
    }

    #[test]
    fn test_ascii_stats_basic() {
        // 'A' = 65, 'C' = 67
        let stats = ascii_stats("AC");
        assert!((stats.mean - 66.0).abs() < TOL);
        assert!((stats.std - 1.0).abs() < TOL);
        assert_eq!(stats.min, 65.0);
        assert_eq!(stats.max, 67.0);
    }

    #[test]
    fn test_ascii_stats_empty() {
        let stats = ascii_stats("");
        assert_eq!(stats.mean, 0.0);
        assert_eq!(stats.std, 0.0);
        assert_eq!(stats.min, 0.0);
        assert_eq!(stats.max, 0.0);
    }

    #[test]
    fn test_ascii_stats_single_char() {
        let stats = ascii_stats("Z");
        assert_eq!(stats.mean, 90.0);
        assert_eq!(stats.std, 0.0);
        assert_eq!(stats.min, 90.0);
        assert_eq!(stats.max, 90.0);
    }

    #[test]
    fn test_char_class_ratios_partition() {
        for text in ["HELLO123!?", "====", "42", "only letters", "a1!"] {
            let ratios = char_class_ratios(text);
            let total = ratios.digit + ratios.alpha + ratios.symbol;
            assert!((total - 1.0).abs() < TOL, "ratios of {text:?} sum to {total}");
        }
    }

    #[test]
    fn test_char_class_ratios_values() {
        let ratios = char_class_ratios("AB1!");
        assert!((ratios.alpha - 0.5).abs() < TOL);
        assert!((ratios.digit - 0.25).abs() < TOL);
        assert!((ratios.symbol - 0.25).abs() < TOL);
    }

    #[test]
    fn test_char_class_ratios_empty() {
        let ratios = char_class_ratios("");
        assert_eq!(ratios.digit, 0.0);
        assert_eq!(ratios.alpha, 0.0);
        assert_eq!(ratios.symbol, 0.0);
    }

    #[test]
    fn test_base64_markers() {
        let markers = base64_markers("v/MtQ9qTDvQnyS4p7MdkQw==");
        assert_eq!(markers.equals_count, 2);
        assert_eq!(markers.plus_count, 0);
        assert_eq!(markers.slash_count, 1);
        assert!((markers.equals_ratio - 2.0 / 24.0).abs() < TOL);
    }

    #[test]
    fn test_base64_markers_empty() {
        let markers = base64_markers("");
        assert_eq!(markers.equals_count, 0);
        assert_eq!(markers.equals_ratio, 0.0);
    }

    #[test]
    fn test_unique_chars() {
        assert_eq!(unique_chars(""), 0);
        assert_eq!(unique_chars("AAAA"), 1);
        assert_eq!(unique_chars("ABAB"), 2);
        assert_eq!(unique_chars("abcABC"), 6);
    }
}
