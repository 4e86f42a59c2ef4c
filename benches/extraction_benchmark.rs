//! Extraction Performance Benchmarks
//!
//! Tracks the cost of single-text extraction, scaling with input size,
//! parallel batch throughput and the individual cryptanalysis statistics.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use cipherscope::dataset::{aes_ecb_base64, caesar_shift, rc4_base64};
use cipherscope::stats::cryptanalysis;
use cipherscope::{ExtractorConfig, FeatureExtractor, ReferenceTables};

const SENTENCE: &str = "The general ordered the troops to hold the eastern ridge until dawn";

/// Generate one input per scheme the extractor commonly sees
fn generate_inputs() -> Vec<(&'static str, String)> {
    let key = [0x42u8; 16];
    vec![
        ("plaintext_word", "rendezvous".to_string()),
        ("plaintext_sentence", SENTENCE.to_string()),
        ("caesar", caesar_shift(SENTENCE, 3)),
        ("aes_base64", aes_ecb_base64(SENTENCE, &key)),
        ("rc4_base64", rc4_base64(SENTENCE, &key)),
    ]
}

fn generate_text(size: usize) -> String {
    let mut text = String::with_capacity(size + SENTENCE.len());
    while text.len() < size {
        text.push_str(SENTENCE);
        text.push(' ');
    }
    text.truncate(size);
    text
}

/// Benchmark single-text extraction across scheme-shaped inputs
fn benchmark_single_extraction(c: &mut Criterion) {
    let extractor = FeatureExtractor::new(ExtractorConfig::default()).unwrap();
    let inputs = generate_inputs();

    let mut group = c.benchmark_group("single_extraction");

    for (name, text) in &inputs {
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("extract", name), text, |b, input| {
            b.iter(|| extractor.extract(black_box(input)))
        });
    }

    group.finish();
}

/// Benchmark extraction with varying input sizes
fn benchmark_input_sizes(c: &mut Criterion) {
    let extractor = FeatureExtractor::new(ExtractorConfig::default()).unwrap();

    let mut group = c.benchmark_group("input_sizes");

    for size in [64, 256, 1024, 4096, 16384] {
        let text = generate_text(size);

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("bytes", size), &text, |b, input| {
            b.iter(|| extractor.extract(black_box(input)))
        });
    }

    group.finish();
}

/// Benchmark parallel batch extraction
fn benchmark_batch_extraction(c: &mut Criterion) {
    let extractor = FeatureExtractor::new(ExtractorConfig::default()).unwrap();
    let key = [0x17u8; 16];

    let texts: Vec<String> = (0..256)
        .map(|i| match i % 4 {
            0 => SENTENCE.to_string(),
            1 => caesar_shift(SENTENCE, (i % 26) as u8),
            2 => aes_ecb_base64(SENTENCE, &key),
            _ => rc4_base64(SENTENCE, &key),
        })
        .collect();

    let mut group = c.benchmark_group("batch_extraction");
    group.throughput(Throughput::Elements(texts.len() as u64));

    group.bench_function("extract_batch_256", |b| {
        b.iter(|| extractor.extract_batch(black_box(&texts)))
    });

    group.finish();
}

/// Benchmark the individual cryptanalysis statistics
fn benchmark_statistics(c: &mut Criterion) {
    let tables = ReferenceTables::default();
    let chars: Vec<char> = generate_text(1024)
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect();

    let mut group = c.benchmark_group("statistics");
    group.throughput(Throughput::Bytes(chars.len() as u64));

    group.bench_function("index_of_coincidence", |b| {
        b.iter(|| cryptanalysis::index_of_coincidence(black_box(&chars)))
    });
    group.bench_function("max_periodic_ic", |b| {
        b.iter(|| cryptanalysis::max_periodic_ic(black_box(&chars), 16))
    });
    group.bench_function("max_kappa", |b| {
        b.iter(|| cryptanalysis::max_kappa(black_box(&chars), 16))
    });
    group.bench_function("digraphic_ic", |b| {
        b.iter(|| cryptanalysis::digraphic_ic(black_box(&chars)))
    });
    group.bench_function("long_repeat", |b| {
        b.iter(|| cryptanalysis::long_repeat(black_box(&chars)))
    });
    group.bench_function("chi_square", |b| {
        b.iter(|| cryptanalysis::chi_square(black_box(&chars), &tables))
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_single_extraction,
    benchmark_input_sizes,
    benchmark_batch_extraction,
    benchmark_statistics,
);

criterion_main!(benches);
