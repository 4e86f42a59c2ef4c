//! Character Pool
//!
//! The ordered character set that defines the per-character frequency
//! columns of the feature schema. Order is first occurrence; duplicates
//! collapse. An empty pool is a configuration error because the schema
//! would have no frequency block.

use anyhow::{bail, Result};

use crate::config::PoolConfig;

/// ASCII punctuation in the order used by the default frequency columns
pub const ASCII_PUNCTUATION: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// Ordered, duplicate-free character pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharPool {
    chars: Vec<char>,
}

impl CharPool {
    /// Build a pool from configuration
    pub fn new(config: &PoolConfig) -> Result<Self> {
        let mut chars: Vec<char> = Vec::new();
        for c in config.charset.chars() {
            if !chars.contains(&c) {
                chars.push(c);
            }
        }
        if config.include_space && !chars.contains(&' ') {
            chars.push(' ');
        }
        if chars.is_empty() {
            bail!("character pool is empty");
        }
        Ok(Self { chars })
    }

    /// Pool characters in column order
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn contains(&self, c: char) -> bool {
        self.chars.contains(&c)
    }
}
