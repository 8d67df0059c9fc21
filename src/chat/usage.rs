//! Token usage parsing for chat responses

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Token counts for one call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

impl TokenUsage {
    /// Read the `usage` (or `tokenUsage`) block of a response
    pub fn from_response(response: &Value) -> Self {
        match response.get("usage").or_else(|| response.get("tokenUsage")) {
            Some(usage) if usage.is_object() => Self::parse(usage),
            _ => {
                warn!("No token usage data found in Solar LLM response");
                Self::default()
            }
        }
    }

    /// Accepts snake_case or camelCase keys; a missing total is prompt + completion
    pub fn parse(usage: &Value) -> Self {
        let read = |snake: &str, camel: &str| {
            usage
                .get(snake)
                .or_else(|| usage.get(camel))
                .and_then(Value::as_u64)
        };

        let completion_tokens = read("completion_tokens", "completionTokens").unwrap_or(0);
        let prompt_tokens = read("prompt_tokens", "promptTokens").unwrap_or(0);
        let total_tokens = read("total_tokens", "totalTokens")
            .filter(|t| *t > 0)
            .unwrap_or(prompt_tokens + completion_tokens);

        debug!(
            "Solar LLM token usage prompt={} completion={} total={}",
            prompt_tokens, completion_tokens, total_tokens
        );

        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens,
        }
    }
}
