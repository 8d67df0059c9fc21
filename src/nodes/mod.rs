//! Per-item execution at the workflow-host boundary.
//!
//! The host hands over a list of JSON items with their evaluated parameters;
//! each node processes them one after another and returns one output record
//! per item.

pub mod chat;
pub mod embeddings;

pub use chat::{ChatNode, ChatParams};
pub use embeddings::{EmbeddingsInput, EmbeddingsNode, EmbeddingsParams};

use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::future::Future;
use tracing::warn;

/// How a failing item affects the rest of the run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// The first error aborts the run
    #[default]
    FailFast,
    /// A failing item yields `{ "error": message }` and the run continues
    ContinueOnFail,
}

/// One input item with the parameters evaluated for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeItem<P> {
    #[serde(default)]
    pub json: Value,
    pub params: P,
}

impl<P> NodeItem<P> {
    pub fn new(json: Value, params: P) -> Self {
        Self { json, params }
    }
}

/// Output record paired with the index of the item that produced it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeOutput {
    pub json: Value,
    pub paired_item: usize,
}

impl NodeOutput {
    pub fn is_error(&self) -> bool {
        self.json.get("error").is_some()
    }
}

/// Process `items` sequentially with `f`
pub async fn run_items<'a, T, F, Fut>(items: &'a [T], mode: ExecutionMode, mut f: F) -> Result<Vec<NodeOutput>>
where
    F: FnMut(usize, &'a T) -> Fut,
    Fut: Future<Output = Result<Value>>,
{
    let mut outputs = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        match f(index, item).await {
            Ok(json) => outputs.push(NodeOutput {
                json,
                paired_item: index,
            }),
            Err(e) if mode == ExecutionMode::ContinueOnFail => {
                warn!("Item {} failed, continuing: {}", index, e);
                outputs.push(NodeOutput {
                    json: json!({ "error": e.to_string() }),
                    paired_item: index,
                });
            }
            Err(e) => return Err(e),
        }
    }

    Ok(outputs)
}
