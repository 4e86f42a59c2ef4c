//! Statistical Feature Functions
//!
//! Pure functions over normalized text, split into two batteries:
//!
//! - `primitive`: entropy, code point summary, character class ratios,
//!   base64 markers
//! - `cryptanalysis`: coincidence statistics, digraph scores, rank
//!   displacement and chi-square against English
//!
//! Every function is total. Degenerate inputs produce the documented
//! numeric defaults instead of errors.

pub mod cryptanalysis;
pub mod primitive;
