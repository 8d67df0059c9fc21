//! Telemetry sinks receiving input/output observations from instrumented calls

use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};

/// The two instrumented embedding operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmbeddingOperation {
    /// `embed_many`
    Documents,
    /// `embed_one`
    Query,
}

impl EmbeddingOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmbeddingOperation::Documents => "embed_documents",
            EmbeddingOperation::Query => "embed_query",
        }
    }

    /// Completion signal emitted after a successful call
    pub fn event_name(&self) -> &'static str {
        match self {
            EmbeddingOperation::Documents => "ai-document-embedded",
            EmbeddingOperation::Query => "ai-query-embedded",
        }
    }
}

/// Receiver for telemetry around instrumented calls.
///
/// Observations carry no control-flow significance: a sink cannot fail or
/// alter the call it observes.
pub trait TelemetrySink: Send + Sync {
    /// Record the raw input of a call; returns the run index used to pair the output
    fn input_observed(&self, operation: EmbeddingOperation, payload: &Value) -> usize;

    /// Record the result of the run started by `input_observed`
    fn output_observed(&self, operation: EmbeddingOperation, run_index: usize, payload: &Value, elapsed: Duration);

    /// Record a failed run. The error itself is returned to the caller unchanged.
    fn error_observed(&self, _operation: EmbeddingOperation, _run_index: usize, _message: &str, _elapsed: Duration) {}

    /// The run was dropped before it produced an output or an error
    fn run_abandoned(&self, _operation: EmbeddingOperation, _run_index: usize) {}

    /// Emit a named signal
    fn event(&self, name: &str);
}

/// Sink that writes observations to the `tracing` subscriber
#[derive(Debug, Default)]
pub struct TracingSink {
    runs: AtomicUsize,
}

impl TracingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TelemetrySink for TracingSink {
    fn input_observed(&self, operation: EmbeddingOperation, payload: &Value) -> usize {
        let run_index = self.runs.fetch_add(1, Ordering::Relaxed);
        debug!(
            operation = operation.as_str(),
            run_index,
            inputs = payload.as_array().map(Vec::len).unwrap_or(1),
            "Embedding input observed"
        );
        run_index
    }

    fn output_observed(&self, operation: EmbeddingOperation, run_index: usize, payload: &Value, elapsed: Duration) {
        debug!(
            operation = operation.as_str(),
            run_index,
            outputs = payload.as_array().map(Vec::len).unwrap_or(0),
            elapsed_ms = elapsed.as_millis() as u64,
            "Embedding output observed"
        );
    }

    fn error_observed(&self, operation: EmbeddingOperation, run_index: usize, message: &str, elapsed: Duration) {
        warn!(
            operation = operation.as_str(),
            run_index,
            elapsed_ms = elapsed.as_millis() as u64,
            "Embedding run failed: {}",
            message
        );
    }

    fn run_abandoned(&self, operation: EmbeddingOperation, run_index: usize) {
        debug!(operation = operation.as_str(), run_index, "Embedding run cancelled");
    }

    fn event(&self, name: &str) {
        info!(event = name, "Telemetry event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_names() {
        assert_eq!(EmbeddingOperation::Documents.event_name(), "ai-document-embedded");
        assert_eq!(EmbeddingOperation::Query.event_name(), "ai-query-embedded");
    }

    #[test]
    fn test_tracing_sink_run_indices_increase() {
        let sink = TracingSink::new();
        let first = sink.input_observed(EmbeddingOperation::Query, &json!("a"));
        let second = sink.input_observed(EmbeddingOperation::Documents, &json!(["a", "b"]));
        assert_eq!((first, second), (0, 1));
    }
}
