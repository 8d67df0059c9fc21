//! Data models for chat completion requests and responses

use super::usage::TokenUsage;
use crate::config::ChatConfig;
use crate::error::ProviderError;
use crate::validation::{InputValidator, ValidationError};
use serde::{Deserialize, Serialize};

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    #[default]
    User,
    Assistant,
}

/// One message of a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Per-call sampling options; unset fields are left out of the request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatOptions {
    /// Overrides the client's model for this call
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub top_p: Option<f32>,
    #[serde(default)]
    pub frequency_penalty: Option<f32>,
    #[serde(default)]
    pub presence_penalty: Option<f32>,
    #[serde(default)]
    pub reasoning_effort: Option<String>,
    #[serde(default)]
    pub response_format: Option<serde_json::Value>,
    #[serde(default)]
    pub stream: bool,
}

impl ChatOptions {
    pub fn from_config(config: &ChatConfig) -> Self {
        Self {
            model: None,
            temperature: Some(config.temperature),
            max_tokens: config.max_tokens,
            top_p: config.top_p,
            frequency_penalty: config.frequency_penalty,
            presence_penalty: config.presence_penalty,
            reasoning_effort: config.reasoning_effort.clone(),
            response_format: config.response_format.clone(),
            stream: config.streaming,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(t) = self.temperature {
            InputValidator::validate_range("temperature", t as f64, 0.0, 2.0)?;
        }
        if let Some(p) = self.top_p {
            InputValidator::validate_range("top_p", p as f64, 0.0, 1.0)?;
        }
        if let Some(m) = self.max_tokens {
            InputValidator::validate_range("max_tokens", m as f64, 1.0, 32768.0)?;
        }
        if let Some(f) = self.frequency_penalty {
            InputValidator::validate_range("frequency_penalty", f as f64, -2.0, 2.0)?;
        }
        if let Some(p) = self.presence_penalty {
            InputValidator::validate_range("presence_penalty", p as f64, -2.0, 2.0)?;
        }
        Ok(())
    }
}

/// Wire body for `POST /chat/completions`
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning_effort: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<&'a serde_json::Value>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub stream: bool,
}

impl<'a> ChatRequest<'a> {
    pub fn new(model: &'a str, messages: &'a [ChatMessage], options: &'a ChatOptions) -> Self {
        Self {
            model,
            messages,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            top_p: options.top_p,
            frequency_penalty: options.frequency_penalty,
            presence_penalty: options.presence_penalty,
            reasoning_effort: options.reasoning_effort.as_deref(),
            response_format: options.response_format.as_ref(),
            stream: options.stream,
        }
    }
}

/// Decoded `chat/completions` response
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub created: Option<i64>,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ResponseMessage>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Result of a chat call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCompletion {
    /// First choice's message content, empty when absent
    pub content: String,
    pub usage: TokenUsage,
    pub model: Option<String>,
    pub created: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
    /// The full decoded response body
    pub raw: serde_json::Value,
}

impl ChatCompletion {
    /// Decode a completion from a response JSON value
    pub fn from_value(raw: serde_json::Value) -> Result<Self, ProviderError> {
        if !raw.is_object() {
            return Err(ProviderError::Protocol("chat response is not a JSON object".to_string()));
        }

        let response: ChatResponse = serde_json::from_value(raw.clone())
            .map_err(|e| ProviderError::Protocol(format!("malformed chat response: {}", e)))?;

        let first = response.choices.into_iter().next();
        let finish_reason = first.as_ref().and_then(|c| c.finish_reason.clone());
        let content = first
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .unwrap_or_default();

        Ok(Self {
            content,
            usage: TokenUsage::from_response(&raw),
            model: response.model,
            created: response.created,
            finish_reason,
            raw,
        })
    }
}
