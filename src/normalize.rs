//! Input Normalization
//!
//! Canonicalizes raw text before feature extraction. Case is always folded
//! to uppercase so letter statistics see one alphabet; whitespace removal
//! follows the configured policy.

use crate::config::NormalizeConfig;

/// Text normalizer applied before any statistic is computed
#[derive(Debug, Clone)]
pub struct Normalizer {
    strip_whitespace: bool,
}

impl Normalizer {
    /// Create a normalizer from configuration
    pub fn new(config: &NormalizeConfig) -> Self {
        Self {
            strip_whitespace: config.strip_whitespace,
        }
    }

    /// Canonicalize one raw input string
    ///
    /// Idempotent: applying the result again yields the same string.
    pub fn apply(&self, text: &str) -> String {
        let upper = text.to_uppercase();
        if self.strip_whitespace {
            upper.chars().filter(|c| !c.is_whitespace()).collect()
        } else {
            upper
        }
    }

    /// Whether the policy removes whitespace
    pub fn strips_whitespace(&self) -> bool {
        self.strip_whitespace
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(&NormalizeConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer(strip_whitespace: bool) -> Normalizer {
        Normalizer::new(&NormalizeConfig { strip_whitespace })
    }

    #[test]
    fn test_uppercases() {
        let n = normalizer(false);
        assert_eq!(n.apply("Hello, World!"), "HELLO, WORLD!");
    }

    #[test]
    fn test_strips_whitespace_by_policy() {
        let stripping = normalizer(true);
        let keeping = normalizer(false);
        assert_eq!(stripping.apply("hello world"), "HELLOWORLD");
        assert_eq!(keeping.apply("hello world"), "HELLO WORLD");
    }

    #[test]
    fn test_strips_all_whitespace_kinds() {
        let n = normalizer(true);
        assert_eq!(n.apply("a b\tc\nd\r\ne"), "ABCDE");
    }

    #[test]
    fn test_idempotent() {
        for strip in [true, false] {
            let n = normalizer(strip);
            let once = n.apply("Attack at Dawn! 123");
            assert_eq!(n.apply(&once), once);
        }
    }

    #[test]
    fn test_empty_input() {
        let n = Normalizer::default();
        assert_eq!(n.apply(""), "");
    }

    #[test]
    fn test_non_letters_untouched() {
        let n = Normalizer::default();
        assert_eq!(n.apply("a+b/c=="), "A+B/C==");
    }
}
