//! Extraction Metrics
//!
//! Counters and timing for batch feature extraction:
//! - Input and batch counters
//! - Per-label record counts for dataset runs
//! - Batch latency percentiles
//!
//! Collection is lock-light: plain counters are atomics, the label map and
//! the latency samples sit behind [`parking_lot::RwLock`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Extraction metrics collector
pub struct ExtractorMetrics {
    // Input counters
    texts_total: AtomicU64,
    empty_inputs: AtomicU64,

    // Batch counters
    batches_total: AtomicU64,
    rows_written: AtomicU64,

    // Per-label counters for labeled runs
    records_by_label: RwLock<HashMap<String, u64>>,

    // Batch latency tracking
    batch_latency: RwLock<Histogram>,

    // Start time for uptime calculation
    start_time: Instant,
}

impl ExtractorMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            texts_total: AtomicU64::new(0),
            empty_inputs: AtomicU64::new(0),
            batches_total: AtomicU64::new(0),
            rows_written: AtomicU64::new(0),
            records_by_label: RwLock::new(HashMap::new()),
            batch_latency: RwLock::new(Histogram::new()),
            start_time: Instant::now(),
        }
    }

    /// Record one extraction batch
    ///
    /// `empty` counts inputs that were empty or whitespace only; they still
    /// produce rows, the counter just makes degenerate datasets visible.
    pub fn record_batch(&self, texts: usize, empty: usize, duration: Duration) {
        self.batches_total.fetch_add(1, Ordering::Relaxed);
        self.texts_total.fetch_add(texts as u64, Ordering::Relaxed);
        self.empty_inputs.fetch_add(empty as u64, Ordering::Relaxed);

        let ms = duration.as_secs_f64() * 1000.0;
        self.batch_latency.write().observe(ms);
    }

    /// Record labels from a labeled dataset run
    pub fn record_labels<'a, I>(&self, labels: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut by_label = self.records_by_label.write();
        for label in labels {
            *by_label.entry(label.to_string()).or_insert(0) += 1;
        }
    }

    /// Record rows flushed to an output file
    pub fn record_rows_written(&self, rows: u64) {
        self.rows_written.fetch_add(rows, Ordering::Relaxed);
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Export metrics as JSON
    pub fn json(&self) -> serde_json::Value {
        let latency = self.batch_latency.read();
        let by_label = self.records_by_label.read();

        serde_json::json!({
            "texts": {
                "total": self.texts_total.load(Ordering::Relaxed),
                "empty": self.empty_inputs.load(Ordering::Relaxed)
            },
            "batches": {
                "total": self.batches_total.load(Ordering::Relaxed),
                "mean_ms": latency.mean(),
                "p50_ms": latency.percentile(50.0),
                "p99_ms": latency.percentile(99.0)
            },
            "rows_written": self.rows_written.load(Ordering::Relaxed),
            "records_by_label": by_label.clone(),
            "uptime_seconds": self.uptime_secs()
        })
    }

    /// Get summary statistics
    pub fn summary(&self) -> MetricsSummary {
        let latency = self.batch_latency.read();

        MetricsSummary {
            texts_total: self.texts_total.load(Ordering::Relaxed),
            empty_inputs: self.empty_inputs.load(Ordering::Relaxed),
            batches_total: self.batches_total.load(Ordering::Relaxed),
            rows_written: self.rows_written.load(Ordering::Relaxed),
            batch_p50_ms: latency.percentile(50.0),
            batch_p99_ms: latency.percentile(99.0),
            uptime_secs: self.uptime_secs(),
        }
    }

    /// Reset all metrics
    pub fn reset(&self) {
        self.texts_total.store(0, Ordering::Relaxed);
        self.empty_inputs.store(0, Ordering::Relaxed);
        self.batches_total.store(0, Ordering::Relaxed);
        self.rows_written.store(0, Ordering::Relaxed);

        self.records_by_label.write().clear();
        *self.batch_latency.write() = Histogram::new();
    }
}

impl Default for ExtractorMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary of metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub texts_total: u64,
    pub empty_inputs: u64,
    pub batches_total: u64,
    pub rows_written: u64,
    pub batch_p50_ms: f64,
    pub batch_p99_ms: f64,
    pub uptime_secs: u64,
}

/// Sampled latency histogram
struct Histogram {
    sum: f64,
    count: u64,
    values: Vec<f64>, // For percentile calculation
}

impl Histogram {
    fn new() -> Self {
        Self {
            sum: 0.0,
            count: 0,
            values: Vec::new(),
        }
    }

    fn observe(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
        self.values.push(value);

        // Keep values bounded for memory
        if self.values.len() > 10000 {
            self.values.remove(0);
        }
    }

    fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }

    fn percentile(&self, p: f64) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }

        let mut sorted = self.values.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let idx = ((p / 100.0) * (sorted.len() - 1) as f64).round() as usize;
        sorted[idx.min(sorted.len() - 1)]
    }
}
