//! Dataset Generation
//!
//! Builds labeled training corpora: every plaintext sentence yields four
//! records, one per scheme, in a fixed label order. The ciphers here are
//! reference implementations for producing labeled data, not hardened
//! cryptography.

use std::fmt;
use std::str::FromStr;

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockEncrypt, KeyInit};
use aes::Aes128;
use anyhow::bail;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::DatasetConfig;

const AES_BLOCK: usize = 16;
const KEY_LEN: usize = 16;

/// Encryption scheme labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SchemeLabel {
    Plaintext,
    Caesar,
    Aes,
    Rc4,
}

impl SchemeLabel {
    /// All labels in generation order
    pub const ALL: [SchemeLabel; 4] = [
        SchemeLabel::Plaintext,
        SchemeLabel::Caesar,
        SchemeLabel::Aes,
        SchemeLabel::Rc4,
    ];

    /// Canonical label string used in dataset files
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemeLabel::Plaintext => "Plaintext",
            SchemeLabel::Caesar => "Caesar",
            SchemeLabel::Aes => "AES",
            SchemeLabel::Rc4 => "RC4",
        }
    }
}

impl fmt::Display for SchemeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemeLabel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Plaintext" => Ok(SchemeLabel::Plaintext),
            "Caesar" => Ok(SchemeLabel::Caesar),
            "AES" => Ok(SchemeLabel::Aes),
            "RC4" => Ok(SchemeLabel::Rc4),
            other => bail!("unknown scheme label: {other}"),
        }
    }
}

/// Shift alphabetic characters by `shift` positions, preserving case;
/// everything else passes through
pub fn caesar_shift(text: &str, shift: u8) -> String {
    let shift = shift % 26;
    text.chars()
        .map(|c| match c {
            'A'..='Z' => (((c as u8 - b'A' + shift) % 26) + b'A') as char,
            'a'..='z' => (((c as u8 - b'a' + shift) % 26) + b'a') as char,
            _ => c,
        })
        .collect()
}

/// AES-128-ECB over the PKCS7-padded UTF-8 bytes, base64-encoded
pub fn aes_ecb_base64(plaintext: &str, key: &[u8; KEY_LEN]) -> String {
    let cipher = Aes128::new(key.into());

    let mut data = plaintext.as_bytes().to_vec();
    let pad = AES_BLOCK - (data.len() % AES_BLOCK);
    data.extend(std::iter::repeat(pad as u8).take(pad));

    for chunk in data.chunks_exact_mut(AES_BLOCK) {
        let block = GenericArray::from_mut_slice(chunk);
        cipher.encrypt_block(block);
    }
    BASE64.encode(&data)
}

/// RC4 keystream XOR of the UTF-8 bytes, base64-encoded
pub fn rc4_base64(plaintext: &str, key: &[u8; KEY_LEN]) -> String {
    BASE64.encode(rc4_apply(plaintext.as_bytes(), key))
}

/// Classic RC4: key scheduling then pseudo-random generation, XORed over
/// the data; applying it twice with the same key restores the input
fn rc4_apply(data: &[u8], key: &[u8]) -> Vec<u8> {
    let mut s: [u8; 256] = std::array::from_fn(|i| i as u8);

    let mut j = 0u8;
    for i in 0..256 {
        j = j.wrapping_add(s[i]).wrapping_add(key[i % key.len()]);
        s.swap(i, j as usize);
    }

    let mut out = Vec::with_capacity(data.len());
    let (mut i, mut j) = (0u8, 0u8);
    for &byte in data {
        i = i.wrapping_add(1);
        j = j.wrapping_add(s[i as usize]);
        s.swap(i as usize, j as usize);
        let k = s[s[i as usize].wrapping_add(s[j as usize]) as usize];
        out.push(byte ^ k);
    }
    out
}

/// Labeled dataset generator
pub struct DatasetGenerator {
    config: DatasetConfig,
    rng: StdRng,
}

impl DatasetGenerator {
    /// Create a generator; a configured seed makes runs reproducible
    pub fn new(config: DatasetConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { config, rng }
    }

    /// Generate four labeled records per sentence, in scheme order
    ///
    /// Sentences are truncated to the configured length first; each
    /// sentence gets fresh random keys.
    pub fn generate(&mut self, sentences: &[String]) -> Vec<(String, SchemeLabel)> {
        let mut records = Vec::with_capacity(sentences.len() * SchemeLabel::ALL.len());
        for sentence in sentences {
            let truncated = truncate_chars(sentence, self.config.truncate_len);

            let mut aes_key = [0u8; KEY_LEN];
            self.rng.fill_bytes(&mut aes_key);
            let mut rc4_key = [0u8; KEY_LEN];
            self.rng.fill_bytes(&mut rc4_key);

            records.push((truncated.clone(), SchemeLabel::Plaintext));
            records.push((
                caesar_shift(&truncated, self.config.caesar_shift),
                SchemeLabel::Caesar,
            ));
            records.push((aes_ecb_base64(&truncated, &aes_key), SchemeLabel::Aes));
            records.push((rc4_base64(&truncated, &rc4_key), SchemeLabel::Rc4));
        }
        records
    }
}

/// Truncate to at most `max` characters on a char boundary
fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
