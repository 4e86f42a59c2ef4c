//! Cipherscope Feature Extraction Library
//!
//! Turns raw text into fixed-order numeric feature vectors for cipher-type
//! classification. The same input always produces the same vector, so
//! datasets extracted on different machines or days line up column for
//! column.
//!
//! # Features
//!
//! - **Classical cryptanalysis statistics**: index of coincidence, periodic
//!   and kappa scans, digraphic measures, rank displacement, chi-square
//! - **Primitive text statistics**: length, entropy, ASCII summary,
//!   character-class ratios, base64 markers
//! - **Dataset generation**: labeled Caesar, AES-128-ECB and RC4 corpora
//!   from plaintext sentences
//! - **Batch extraction**: parallel table extraction with CSV output
//!
//! # Example
//!
//! ```ignore
//! use cipherscope::{ExtractorConfig, FeatureExtractor};
//!
//! let extractor = FeatureExtractor::new(ExtractorConfig::default())?;
//! let vector = extractor.extract("WKH TXLFN EURZQ IRA");
//! println!("ic = {:?}", vector.get("ic"));
//! ```

pub mod config;
pub mod dataset;
pub mod extractor;
pub mod features;
pub mod metrics;
pub mod model;
pub mod normalize;
pub mod pool;
pub mod stats;
pub mod table;
pub mod tables;

// Re-exports for convenience
pub use config::{DatasetConfig, ExtractorConfig, NormalizeConfig, PoolConfig, TableConfig};
pub use dataset::{DatasetGenerator, SchemeLabel};
pub use extractor::FeatureExtractor;
pub use features::{FeatureSchema, FeatureVector, SCALAR_FEATURES};
pub use metrics::{ExtractorMetrics, MetricsSummary};
pub use model::{Classify, SchemeClassifier};
pub use table::FeatureTable;
pub use tables::ReferenceTables;
