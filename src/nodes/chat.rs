//! Chat node: runs one completion per item

use super::{run_items, ExecutionMode, NodeItem, NodeOutput};
use crate::chat::{ChatMessage, ChatModel, ChatOptions};
use crate::error::{Result, SolarError};
use crate::telemetry::MetricsCollector;
use crate::validation::ValidationError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;

/// Parameters evaluated for one item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatParams {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(flatten)]
    pub options: ChatOptions,
}

/// Node sending each item's conversation to a chat model
pub struct ChatNode<C> {
    model: C,
    metrics: Option<Arc<MetricsCollector>>,
}

impl<C: ChatModel> ChatNode<C> {
    pub fn new(model: C) -> Self {
        Self {
            model,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub async fn execute(&self, items: &[NodeItem<ChatParams>], mode: ExecutionMode) -> Result<Vec<NodeOutput>> {
        run_items(items, mode, |_, item| self.process(&item.params)).await
    }

    async fn process(&self, params: &ChatParams) -> Result<Value> {
        if params.messages.is_empty() {
            return Err(SolarError::Chat(ValidationError::NoMessages.into()));
        }

        let started = Instant::now();
        let result = self.model.complete(&params.messages, &params.options).await;

        let completion = match result {
            Ok(completion) => completion,
            Err(e) => {
                if let Some(metrics) = &self.metrics {
                    metrics.record_error();
                }
                return Err(e);
            }
        };

        if let Some(metrics) = &self.metrics {
            metrics.record_chat(&completion.usage, started.elapsed());
        }

        let model = completion
            .model
            .clone()
            .or_else(|| params.options.model.clone())
            .unwrap_or_else(|| self.model.model().to_string());

        Ok(json!({
            "content": completion.content,
            "usage": completion.usage,
            "model": model,
            "created": completion.created,
            "full_response": completion.raw,
        }))
    }
}
