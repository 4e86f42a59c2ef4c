//! Classical Cryptanalysis Statistics
//!
//! The battery used by cipher-type identification: index of coincidence
//! and its periodic, displaced and digraphic variants, digraph scores
//! against reference tables, rank displacement and chi-square against
//! English letter frequencies.
//!
//! Functions operate on normalized text as a char slice and are total;
//! degenerate lengths yield 0.0. Scale factors follow the conventions of
//! the cipher identification literature: the IC family is reported per
//! mille, the digraphic IC per ten mille, digraph scores times one
//! hundred.

use rustc_hash::FxHashMap;

use crate::tables::{ReferenceTables, ALPHABET_LEN};

/// Raw index of coincidence in [0, 1]; 0.0 below two chars
fn ic_raw(chars: &[char]) -> f64 {
    let len = chars.len();
    if len <= 1 {
        return 0.0;
    }
    let mut counts: FxHashMap<char, u64> = FxHashMap::default();
    for &c in chars {
        *counts.entry(c).or_insert(0) += 1;
    }
    let matches: f64 = counts.values().map(|&f| (f * (f - 1)) as f64).sum();
    matches / (len as f64 * (len - 1) as f64)
}

/// Index of coincidence over all characters, per mille
pub fn index_of_coincidence(chars: &[char]) -> f64 {
    1000.0 * ic_raw(chars)
}

/// Best mean IC over interleaved subsequences for periods below
/// `max_period`, per mille
///
/// Period 1 reproduces the plain IC, so for two or more chars the result
/// is never below it.
pub fn max_periodic_ic(chars: &[char], max_period: usize) -> f64 {
    let len = chars.len();
    let upper = max_period.min(len);
    let mut best = 0.0f64;
    for period in 1..upper {
        let mut sum = 0.0;
        for start in 0..period {
            let sub: Vec<char> = chars[start..].iter().step_by(period).copied().collect();
            sum += ic_raw(&sub);
        }
        let mean = sum / period as f64;
        if mean > best {
            best = mean;
        }
    }
    1000.0 * best
}

/// Best match fraction between the text and itself shifted by lags below
/// `max_lag`, per mille
///
/// Lags at or beyond the text length contribute nothing.
pub fn max_kappa(chars: &[char], max_lag: usize) -> f64 {
    let len = chars.len();
    let mut best = 0.0f64;
    for lag in 1..max_lag {
        if len <= lag {
            continue;
        }
        let matches = (0..len - lag).filter(|&i| chars[i] == chars[i + lag]).count();
        let fraction = matches as f64 / (len - lag) as f64;
        if fraction > best {
            best = fraction;
        }
    }
    1000.0 * best
}

/// Index of coincidence over the overlapping character pairs, times ten
/// thousand; 0.0 for two chars or fewer
pub fn digraphic_ic(chars: &[char]) -> f64 {
    let len = chars.len();
    if len <= 2 {
        return 0.0;
    }
    let mut counts: FxHashMap<(char, char), u64> = FxHashMap::default();
    for w in chars.windows(2) {
        *counts.entry((w[0], w[1])).or_insert(0) += 1;
    }
    let total = (len - 1) as f64;
    let matches: f64 = counts.values().map(|&f| (f * (f - 1)) as f64).sum();
    10000.0 * matches / (total * (total - 1.0))
}

/// Coincidence statistic over the pairs starting at even offsets,
/// normalized by L(L-2); 0.0 for two chars or fewer
pub fn even_digraphic_ic(chars: &[char]) -> f64 {
    let len = chars.len();
    if len <= 2 {
        return 0.0;
    }
    let mut counts: FxHashMap<(char, char), u64> = FxHashMap::default();
    let mut i = 0;
    while i + 1 < len {
        *counts.entry((chars[i], chars[i + 1])).or_insert(0) += 1;
        i += 2;
    }
    let matches: f64 = counts.values().map(|&f| (f * (f - 1)) as f64).sum();
    4.0 * matches / (len * (len - 2)) as f64
}

/// Long-repeat score: 1000 times the square root of the repeated trigram
/// instances, over the length; 0.0 below three chars
pub fn long_repeat(chars: &[char]) -> f64 {
    let len = chars.len();
    if len < 3 {
        return 0.0;
    }
    let mut counts: FxHashMap<(char, char, char), u64> = FxHashMap::default();
    for w in chars.windows(3) {
        *counts.entry((w[0], w[1], w[2])).or_insert(0) += 1;
    }
    let repeats: f64 = counts.values().map(|&f| (f - 1) as f64).sum();
    1000.0 * repeats.sqrt() / len as f64
}

/// Mean log-digraph table value over adjacent A-Z pairs, times one
/// hundred; pairs touching a non-letter are excluded from the mean
pub fn log_digraph_score(chars: &[char], tables: &ReferenceTables) -> f64 {
    digraph_mean(chars, &tables.log_digraph, false)
}

/// Mean single-digraph discriminant value over adjacent A-Z pairs, times
/// one hundred
pub fn single_digraph_score(chars: &[char], tables: &ReferenceTables) -> f64 {
    digraph_mean(chars, &tables.single_digraph, false)
}

/// Log-digraph score with each pair looked up in reverse order
///
/// Defined only for even-length text of at least two chars; otherwise
/// 0.0.
pub fn reverse_log_digraph_score(chars: &[char], tables: &ReferenceTables) -> f64 {
    if chars.len() < 2 || chars.len() % 2 != 0 {
        return 0.0;
    }
    digraph_mean(chars, &tables.log_digraph, true)
}

/// Rank displacement of the observed letter frequency order against the
/// English order, summed over the first `rank_window` positions
///
/// The observed order sorts letter indices by descending count, ties
/// toward the alphabetically earlier letter.
pub fn rank_displacement(chars: &[char], tables: &ReferenceTables, rank_window: usize) -> f64 {
    let mut counts = [0u64; ALPHABET_LEN];
    for &c in chars {
        if let Some(i) = letter_index(c) {
            counts[i] += 1;
        }
    }
    let mut order: [usize; ALPHABET_LEN] = std::array::from_fn(|i| i);
    order.sort_by(|&a, &b| counts[b].cmp(&counts[a]).then(a.cmp(&b)));

    let window = rank_window.min(ALPHABET_LEN);
    let english = tables.english_rank_order();
    (0..window)
        .map(|i| (english[i] as i64 - order[i] as i64).abs() as f64)
        .sum()
}

/// Chi-square of the observed A-Z counts against the English expectation
///
/// The expectation is rel_freq times the full normalized length, so heavy
/// non-letter content inflates the statistic. 0.0 for the empty string.
pub fn chi_square(chars: &[char], tables: &ReferenceTables) -> f64 {
    let len = chars.len();
    if len == 0 {
        return 0.0;
    }
    let mut counts = [0u64; ALPHABET_LEN];
    for &c in chars {
        if let Some(i) = letter_index(c) {
            counts[i] += 1;
        }
    }
    let mut chi = 0.0;
    for (i, &count) in counts.iter().enumerate() {
        let expected = tables.letter_frequency(i) * len as f64;
        if expected > 0.0 {
            let diff = count as f64 - expected;
            chi += diff * diff / expected;
        }
    }
    chi
}

fn letter_index(c: char) -> Option<usize> {
    if c.is_ascii_uppercase() {
        Some(c as usize - 'A' as usize)
    } else {
        None
    }
}

fn digraph_mean(chars: &[char], table: &[[f64; ALPHABET_LEN]; ALPHABET_LEN], reversed: bool) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for w in chars.windows(2) {
        if let (Some(a), Some(b)) = (letter_index(w[0]), letter_index(w[1])) {
            sum += if reversed { table[b][a] } else { table[a][b] };
            count += 1;
        }
    }
    if count == 0 {
        0.0
    } else {
        100.0 * sum / count as f64
    }
}
