//! Cipherscope CLI
//!
//! Command-line interface for dataset generation, batch feature extraction
//! and scheme classification.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, error, info};

use cipherscope::table::{read_labeled_csv, read_sentences, write_dataset_csv};
use cipherscope::{
    DatasetConfig, DatasetGenerator, ExtractorConfig, ExtractorMetrics, FeatureExtractor,
    SchemeClassifier,
};

/// Version information
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "cipherscope")]
#[command(about = "Feature extraction for cipher-type classification", version)]
struct Cli {
    /// Path to a JSON extractor configuration file
    #[arg(long, global = true, env = "CIPHERSCOPE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true, env = "CIPHERSCOPE_VERBOSE")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a labeled cipher dataset from plaintext sentences
    Gen(GenArgs),
    /// Extract feature vectors from texts into a CSV table
    Extract(ExtractArgs),
    /// Train a scheme classifier on a labeled dataset
    Train(TrainArgs),
    /// Classify texts with a trained model
    Classify(ClassifyArgs),
}

#[derive(Args, Debug)]
struct GenArgs {
    /// Input file with one plaintext sentence per line
    #[arg(long)]
    sentences: PathBuf,

    /// Output CSV path for the labeled dataset
    #[arg(long)]
    output: PathBuf,

    /// Shift applied to the Caesar track
    #[arg(long, default_value = "3", env = "CIPHERSCOPE_CAESAR_SHIFT")]
    caesar_shift: u8,

    /// Maximum sentence length in characters
    #[arg(long, default_value = "100", env = "CIPHERSCOPE_TRUNCATE_LEN")]
    truncate_len: usize,

    /// Seed for reproducible key generation
    #[arg(long, env = "CIPHERSCOPE_SEED")]
    seed: Option<u64>,
}

impl GenArgs {
    fn to_config(&self) -> DatasetConfig {
        DatasetConfig {
            caesar_shift: self.caesar_shift,
            truncate_len: self.truncate_len,
            seed: self.seed,
        }
    }
}

#[derive(Args, Debug)]
struct ExtractArgs {
    /// Input file: one text per line, or a labeled CSV with --labeled
    #[arg(long)]
    input: PathBuf,

    /// Treat the input as a labeled dataset CSV
    #[arg(long)]
    labeled: bool,

    /// Output CSV path for the feature table
    #[arg(long)]
    output: PathBuf,
}

#[derive(Args, Debug)]
struct TrainArgs {
    /// Labeled dataset CSV to train on
    #[arg(long)]
    dataset: PathBuf,

    /// Output path for the model JSON
    #[arg(long)]
    output: PathBuf,
}

#[derive(Args, Debug)]
struct ClassifyArgs {
    /// Trained model JSON
    #[arg(long)]
    model: PathBuf,

    /// Read texts to classify from a file, one per line
    #[arg(long)]
    file: Option<PathBuf>,

    /// Texts to classify
    inputs: Vec<String>,
}

/// Install panic hook for production diagnostics
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let payload = panic_info
            .payload()
            .downcast_ref::<&str>()
            .map(|s| *s)
            .or_else(|| {
                panic_info
                    .payload()
                    .downcast_ref::<String>()
                    .map(|s| s.as_str())
            })
            .unwrap_or("Unknown panic payload");

        let location = panic_info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown location".to_string());

        // Use eprintln for panic logging as tracing may not work during panic
        eprintln!("PANIC: cipherscope panicked at {}: {}", location, payload);

        error!(
            panic_payload = %payload,
            panic_location = %location,
            "cipherscope panicked"
        );

        // Call default hook for stack traces in debug builds
        default_hook(panic_info);
    }));
}

fn load_config(path: Option<&Path>) -> Result<ExtractorConfig> {
    match path {
        Some(path) => {
            let config = ExtractorConfig::from_json_file(path)?;
            info!(path = %path.display(), "Configuration loaded");
            Ok(config)
        }
        None => Ok(ExtractorConfig::default()),
    }
}

fn run_gen(args: GenArgs) -> Result<()> {
    let sentences = read_sentences(&args.sentences)?;
    if sentences.is_empty() {
        bail!("no sentences found in {}", args.sentences.display());
    }

    info!(
        sentences = sentences.len(),
        caesar_shift = args.caesar_shift,
        truncate_len = args.truncate_len,
        seed = ?args.seed,
        "Generating labeled dataset"
    );

    let mut generator = DatasetGenerator::new(args.to_config());
    let records: Vec<(String, String)> = generator
        .generate(&sentences)
        .into_iter()
        .map(|(text, label)| (text, label.to_string()))
        .collect();
    write_dataset_csv(&args.output, &records)?;

    info!(
        records = records.len(),
        path = %args.output.display(),
        "Dataset written"
    );
    Ok(())
}

fn run_extract(config: &ExtractorConfig, args: ExtractArgs) -> Result<()> {
    let extractor = FeatureExtractor::new(config.clone())?;
    let metrics = ExtractorMetrics::new();

    let started = Instant::now();
    let table = if args.labeled {
        let records = read_labeled_csv(&args.input)?;
        let empty = count_blank(records.iter().map(|(text, _)| text.as_str()));
        let table = extractor.extract_labeled(&records);
        metrics.record_batch(records.len(), empty, started.elapsed());
        metrics.record_labels(records.iter().map(|(_, label)| label.as_str()));
        table
    } else {
        let texts = read_sentences(&args.input)?;
        let empty = count_blank(texts.iter().map(String::as_str));
        let table = extractor.extract_table(&texts);
        metrics.record_batch(texts.len(), empty, started.elapsed());
        table
    };

    table.write_csv_file(&args.output)?;
    metrics.record_rows_written(table.len() as u64);

    let summary = metrics.summary();
    info!(
        texts = summary.texts_total,
        rows = summary.rows_written,
        features = extractor.schema().len(),
        batch_ms = summary.batch_p50_ms,
        path = %args.output.display(),
        "Extraction complete"
    );
    debug!(metrics = %metrics.json(), "Extraction metrics");
    Ok(())
}

fn run_train(config: &ExtractorConfig, args: TrainArgs) -> Result<()> {
    let records = read_labeled_csv(&args.dataset)?;
    info!(records = records.len(), "Training on labeled dataset");

    let extractor = FeatureExtractor::new(config.clone())?;
    let table = extractor.extract_labeled(&records);
    let model = SchemeClassifier::train(&table)?;
    model.save_json(&args.output)?;

    info!(path = %args.output.display(), "Model written");
    Ok(())
}

fn run_classify(config: &ExtractorConfig, args: ClassifyArgs) -> Result<()> {
    let model = SchemeClassifier::load_json(&args.model)?;
    let extractor = FeatureExtractor::new(config.clone())?;

    if model.schema() != extractor.schema().as_ref() {
        bail!(
            "model was trained with a different feature schema; \
             re-train it or match the pool configuration"
        );
    }

    let mut texts = args.inputs;
    if let Some(path) = &args.file {
        texts.extend(read_sentences(path)?);
    }
    if texts.is_empty() {
        bail!("nothing to classify; pass texts as arguments or use --file");
    }

    for text in &texts {
        let vector = extractor.extract(text);
        let label = model.classify(&vector);
        println!("{label}\t{text}");
    }
    Ok(())
}

fn count_blank<'a, I>(texts: I) -> usize
where
    I: Iterator<Item = &'a str>,
{
    texts.filter(|text| text.trim().is_empty()).count()
}

fn main() -> Result<()> {
    // Install panic hook first for early crash diagnostics
    install_panic_hook();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(format!("{}={}", env!("CARGO_CRATE_NAME"), log_level))
        .with_writer(std::io::stderr)
        .init();

    info!(version = VERSION, "Starting cipherscope");

    let config = load_config(cli.config.as_deref())?;

    let result = match cli.command {
        Command::Gen(args) => run_gen(args),
        Command::Extract(args) => run_extract(&config, args),
        Command::Train(args) => run_train(&config, args),
        Command::Classify(args) => run_classify(&config, args),
    };

    if let Err(e) = &result {
        error!(error = %e, "Command failed");
    }
    result
}
