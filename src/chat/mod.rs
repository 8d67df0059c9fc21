//! Chat completions against Solar models

pub mod client;
pub mod models;
pub mod sse;
pub mod usage;

pub use client::ChatClient;
pub use models::{ChatCompletion, ChatMessage, ChatOptions, ChatRequest, Role};
pub use usage::TokenUsage;

use crate::error::Result;
use async_trait::async_trait;

/// Trait for chat models
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Run one completion over the conversation
    async fn complete(&self, messages: &[ChatMessage], options: &ChatOptions) -> Result<ChatCompletion>;

    /// Model used when the options do not override it
    fn model(&self) -> &str;
}
