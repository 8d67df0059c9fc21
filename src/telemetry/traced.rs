//! Embeddings wrapper that brackets each call with telemetry observations

use super::sink::{EmbeddingOperation, TelemetrySink, TracingSink};
use crate::embedding::EmbeddingProvider;
use crate::error::Result;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::ops::Deref;
use std::sync::Arc;
use std::time::Instant;

/// Wraps an [`EmbeddingProvider`] and reports every `embed_one`/`embed_many`
/// call to a [`TelemetrySink`].
///
/// Results and errors pass through untouched. Everything else the wrapped
/// provider offers is reachable through `Deref`.
pub struct TracedEmbeddings<E> {
    inner: E,
    sink: Arc<dyn TelemetrySink>,
}

impl<E: EmbeddingProvider> TracedEmbeddings<E> {
    /// Wrap `inner`; without a sink, observations go to a [`TracingSink`]
    pub fn new(inner: E, sink: Option<Arc<dyn TelemetrySink>>) -> Self {
        let sink = sink.unwrap_or_else(|| Arc::new(TracingSink::new()));
        Self { inner, sink }
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }

    pub fn into_inner(self) -> E {
        self.inner
    }

    pub fn sink(&self) -> &Arc<dyn TelemetrySink> {
        &self.sink
    }
}

impl<E> Deref for TracedEmbeddings<E> {
    type Target = E;

    fn deref(&self) -> &E {
        &self.inner
    }
}

/// One observed call. Dropping it unfinished, e.g. when the caller's future is
/// cancelled, reports the run as abandoned.
struct ObservedRun<'a> {
    sink: &'a dyn TelemetrySink,
    operation: EmbeddingOperation,
    run_index: usize,
    started: Instant,
    finished: bool,
}

impl<'a> ObservedRun<'a> {
    fn start(sink: &'a dyn TelemetrySink, operation: EmbeddingOperation, input: &Value) -> Self {
        let run_index = sink.input_observed(operation, input);
        Self {
            sink,
            operation,
            run_index,
            started: Instant::now(),
            finished: false,
        }
    }

    fn succeeded(mut self, output: &Value) {
        self.finished = true;
        self.sink
            .output_observed(self.operation, self.run_index, output, self.started.elapsed());
        self.sink.event(self.operation.event_name());
    }

    fn failed(mut self, message: &str) {
        self.finished = true;
        self.sink
            .error_observed(self.operation, self.run_index, message, self.started.elapsed());
    }
}

impl Drop for ObservedRun<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.sink.run_abandoned(self.operation, self.run_index);
        }
    }
}

#[async_trait]
impl<E: EmbeddingProvider> EmbeddingProvider for TracedEmbeddings<E> {
    async fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let run = ObservedRun::start(self.sink.as_ref(), EmbeddingOperation::Query, &json!(text));

        match self.inner.embed_one(text).await {
            Ok(vector) => {
                run.succeeded(&json!(vector));
                Ok(vector)
            }
            Err(e) => {
                run.failed(&e.to_string());
                Err(e)
            }
        }
    }

    async fn embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let run = ObservedRun::start(self.sink.as_ref(), EmbeddingOperation::Documents, &json!(texts));

        match self.inner.embed_many(texts).await {
            Ok(vectors) => {
                run.succeeded(&json!(vectors));
                Ok(vectors)
            }
            Err(e) => {
                run.failed(&e.to_string());
                Err(e)
            }
        }
    }

    fn model(&self) -> &str {
        self.inner.model()
    }
}
