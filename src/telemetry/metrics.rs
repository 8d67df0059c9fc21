//! Metrics collection and reporting

use super::sink::{EmbeddingOperation, TelemetrySink};
use crate::chat::TokenUsage;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Point-in-time copy of the counters
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSnapshot {
    /// Texts sent through `embed_many`
    pub documents_embedded: u64,

    /// Queries sent through `embed_one`
    pub queries_embedded: u64,

    /// Completed chat calls
    pub chat_completions: u64,

    /// Tokens reported by chat responses
    pub chat_tokens: u64,

    /// Failed runs of any kind
    pub total_errors: u64,

    /// Embedding runs dropped before finishing
    pub cancelled_runs: u64,

    /// Embedding runs started but not yet finished
    pub runs_in_flight: u64,

    /// Average embedding run time (ms)
    pub avg_embedding_time_ms: f64,

    /// Uptime in seconds
    pub uptime_secs: u64,
}

/// Latency histogram buckets (in milliseconds)
const LATENCY_BUCKETS: &[f64] = &[10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0, 10000.0, 30000.0];

/// Histogram for tracking latency distribution
#[derive(Debug, Clone)]
pub struct Histogram {
    buckets: Vec<(f64, Arc<AtomicU64>)>,
    sum: Arc<AtomicU64>,
    count: Arc<AtomicU64>,
}

impl Histogram {
    fn new(buckets: &[f64]) -> Self {
        let bucket_counters = buckets
            .iter()
            .map(|&b| (b, Arc::new(AtomicU64::new(0))))
            .collect();

        Self {
            buckets: bucket_counters,
            sum: Arc::new(AtomicU64::new(0)),
            count: Arc::new(AtomicU64::new(0)),
        }
    }

    fn observe(&self, value_ms: f64) {
        self.sum.fetch_add(value_ms as u64, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);

        // cumulative buckets
        for (bucket, counter) in &self.buckets {
            if value_ms <= *bucket {
                counter.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    fn mean(&self) -> f64 {
        match self.count() {
            0 => 0.0,
            n => self.sum.load(Ordering::Relaxed) as f64 / n as f64,
        }
    }

    fn export_prometheus(&self, name: &str, help: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!("# HELP {} {}\n", name, help));
        output.push_str(&format!("# TYPE {} histogram\n", name));

        for (bucket, counter) in &self.buckets {
            let count = counter.load(Ordering::Relaxed);
            output.push_str(&format!("{}_bucket{{le=\"{}\"}} {}\n", name, bucket, count));
        }

        let total_count = self.count();
        output.push_str(&format!("{}_bucket{{le=\"+Inf\"}} {}\n", name, total_count));

        let sum = self.sum.load(Ordering::Relaxed) as f64;
        output.push_str(&format!("{}_sum {:.3}\n", name, sum));
        output.push_str(&format!("{}_count {}\n", name, total_count));

        output
    }
}

/// Metrics collector.
///
/// Also usable as a [`TelemetrySink`]: embedding runs observed through
/// [`TracedEmbeddings`](super::TracedEmbeddings) update the counters and the
/// embedding latency histogram.
#[derive(Debug)]
pub struct MetricsCollector {
    start_time: Instant,
    documents_embedded: AtomicU64,
    queries_embedded: AtomicU64,
    chat_completions: AtomicU64,
    chat_tokens: AtomicU64,
    total_errors: AtomicU64,
    events: AtomicU64,
    next_run: AtomicUsize,
    cancelled_runs: AtomicU64,
    runs_in_flight: AtomicU64,

    embedding_latency: Histogram,
    chat_latency: Histogram,
}

impl MetricsCollector {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            documents_embedded: AtomicU64::new(0),
            queries_embedded: AtomicU64::new(0),
            chat_completions: AtomicU64::new(0),
            chat_tokens: AtomicU64::new(0),
            total_errors: AtomicU64::new(0),
            events: AtomicU64::new(0),
            next_run: AtomicUsize::new(0),
            cancelled_runs: AtomicU64::new(0),
            runs_in_flight: AtomicU64::new(0),
            embedding_latency: Histogram::new(LATENCY_BUCKETS),
            chat_latency: Histogram::new(LATENCY_BUCKETS),
        }
    }

    /// Record embedded texts for an operation
    pub fn record_embedding(&self, operation: EmbeddingOperation, texts: u64, duration: Duration) {
        match operation {
            EmbeddingOperation::Documents => self.documents_embedded.fetch_add(texts, Ordering::Relaxed),
            EmbeddingOperation::Query => self.queries_embedded.fetch_add(texts, Ordering::Relaxed),
        };
        self.embedding_latency.observe(duration.as_millis() as f64);
    }

    /// Record a finished chat completion
    pub fn record_chat(&self, usage: &TokenUsage, duration: Duration) {
        self.chat_completions.fetch_add(1, Ordering::Relaxed);
        self.chat_tokens.fetch_add(usage.total_tokens, Ordering::Relaxed);
        self.chat_latency.observe(duration.as_millis() as f64);
    }

    /// Record an error
    pub fn record_error(&self) {
        self.total_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of telemetry events received
    pub fn events(&self) -> u64 {
        self.events.load(Ordering::Relaxed)
    }

    /// Get current metrics
    pub fn get_metrics(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            documents_embedded: self.documents_embedded.load(Ordering::Relaxed),
            queries_embedded: self.queries_embedded.load(Ordering::Relaxed),
            chat_completions: self.chat_completions.load(Ordering::Relaxed),
            chat_tokens: self.chat_tokens.load(Ordering::Relaxed),
            total_errors: self.total_errors.load(Ordering::Relaxed),
            cancelled_runs: self.cancelled_runs.load(Ordering::Relaxed),
            runs_in_flight: self.runs_in_flight.load(Ordering::Relaxed),
            avg_embedding_time_ms: self.embedding_latency.mean(),
            uptime_secs: self.start_time.elapsed().as_secs(),
        }
    }

    /// Export metrics in Prometheus format
    pub fn export_prometheus(&self) -> String {
        let metrics = self.get_metrics();

        let mut output = format!(
            "# HELP solar_documents_embedded_total Texts embedded as documents\n\
             # TYPE solar_documents_embedded_total counter\n\
             solar_documents_embedded_total {}\n\
             \n\
             # HELP solar_queries_embedded_total Texts embedded as queries\n\
             # TYPE solar_queries_embedded_total counter\n\
             solar_queries_embedded_total {}\n\
             \n\
             # HELP solar_chat_completions_total Completed chat calls\n\
             # TYPE solar_chat_completions_total counter\n\
             solar_chat_completions_total {}\n\
             \n\
             # HELP solar_chat_tokens_total Tokens reported by chat responses\n\
             # TYPE solar_chat_tokens_total counter\n\
             solar_chat_tokens_total {}\n\
             \n\
             # HELP solar_errors_total Total number of failed calls\n\
             # TYPE solar_errors_total counter\n\
             solar_errors_total {}\n\
             \n\
             # HELP solar_cancelled_runs_total Embedding runs dropped before finishing\n\
             # TYPE solar_cancelled_runs_total counter\n\
             solar_cancelled_runs_total {}\n\
             \n\
             # HELP solar_runs_in_flight Embedding runs currently in progress\n\
             # TYPE solar_runs_in_flight gauge\n\
             solar_runs_in_flight {}\n\
             \n\
             # HELP solar_uptime_seconds Uptime in seconds\n\
             # TYPE solar_uptime_seconds counter\n\
             solar_uptime_seconds {}\n\
             \n",
            metrics.documents_embedded,
            metrics.queries_embedded,
            metrics.chat_completions,
            metrics.chat_tokens,
            metrics.total_errors,
            metrics.cancelled_runs,
            metrics.runs_in_flight,
            metrics.uptime_secs,
        );

        output.push_str(&self.embedding_latency.export_prometheus(
            "solar_embedding_duration_ms",
            "Embedding call duration in milliseconds",
        ));
        output.push('\n');

        output.push_str(&self.chat_latency.export_prometheus(
            "solar_chat_duration_ms",
            "Chat completion duration in milliseconds",
        ));

        output
    }

    fn finish_run(&self) {
        // unpaired finish calls leave the gauge at zero
        let _ = self
            .runs_in_flight
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| Some(n.saturating_sub(1)));
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetrySink for MetricsCollector {
    fn input_observed(&self, _operation: EmbeddingOperation, _payload: &Value) -> usize {
        self.runs_in_flight.fetch_add(1, Ordering::Relaxed);
        self.next_run.fetch_add(1, Ordering::Relaxed)
    }

    fn output_observed(&self, operation: EmbeddingOperation, _run_index: usize, payload: &Value, elapsed: Duration) {
        let texts = match operation {
            EmbeddingOperation::Documents => payload.as_array().map(|a| a.len() as u64).unwrap_or(0),
            EmbeddingOperation::Query => 1,
        };
        self.finish_run();
        self.record_embedding(operation, texts, elapsed);
    }

    fn error_observed(&self, _operation: EmbeddingOperation, _run_index: usize, _message: &str, _elapsed: Duration) {
        self.finish_run();
        self.record_error();
    }

    fn run_abandoned(&self, _operation: EmbeddingOperation, _run_index: usize) {
        self.finish_run();
        self.cancelled_runs.fetch_add(1, Ordering::Relaxed);
    }

    fn event(&self, _name: &str) {
        self.events.fetch_add(1, Ordering::Relaxed);
    }
}
