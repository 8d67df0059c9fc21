//! Aggregation of streamed (server-sent events) chat responses

use crate::error::ProviderError;
use serde_json::{json, Value};
use tracing::debug;

const DONE_MARKER: &str = "[DONE]";

/// Fold a `text/event-stream` body into the shape of a non-streamed response.
///
/// Each `data:` line carries one chunk; `choices[0].delta.content` pieces are
/// concatenated in arrival order. Reading stops at `data: [DONE]`.
pub fn aggregate_stream(body: &str) -> Result<Value, ProviderError> {
    let mut content = String::new();
    let mut model = Value::Null;
    let mut created = Value::Null;
    let mut id = Value::Null;
    let mut finish_reason = Value::Null;
    let mut usage = Value::Null;
    let mut chunks = 0usize;

    for line in body.lines() {
        let Some(data) = line.trim().strip_prefix("data:") else {
            continue;
        };
        let data = data.trim();
        if data.is_empty() {
            continue;
        }
        if data == DONE_MARKER {
            break;
        }

        let chunk: Value = serde_json::from_str(data)
            .map_err(|e| ProviderError::Protocol(format!("invalid stream chunk: {}", e)))?;
        chunks += 1;

        if id.is_null() {
            id = chunk.get("id").cloned().unwrap_or(Value::Null);
        }
        if model.is_null() {
            model = chunk.get("model").cloned().unwrap_or(Value::Null);
        }
        if created.is_null() {
            created = chunk.get("created").cloned().unwrap_or(Value::Null);
        }
        if let Some(u) = chunk.get("usage").filter(|u| u.is_object()) {
            usage = u.clone();
        }

        if let Some(choice) = chunk.pointer("/choices/0") {
            if let Some(piece) = choice.pointer("/delta/content").and_then(Value::as_str) {
                content.push_str(piece);
            }
            if let Some(reason) = choice.get("finish_reason").filter(|r| !r.is_null()) {
                finish_reason = reason.clone();
            }
        }
    }

    if chunks == 0 {
        return Err(ProviderError::Protocol("stream contained no data chunks".to_string()));
    }

    debug!("Aggregated {} stream chunks into {} characters", chunks, content.len());

    let mut response = json!({
        "id": id,
        "object": "chat.completion",
        "model": model,
        "created": created,
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": finish_reason,
        }],
    });
    if !usage.is_null() {
        response["usage"] = usage;
    }

    Ok(response)
}
