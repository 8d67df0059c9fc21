//! Upstage Solar - chat, embeddings and model catalog client for the Upstage API
//!
//! This library wraps the Upstage REST API for use from workflow-automation
//! nodes: batched and order-preserving embeddings, chat completions with
//! retry, dynamic model selection, and per-item node execution.
//!
//! ## Features
//!
//! - **Batched Embeddings**: Normalization, batching and index-ordered reassembly
//! - **Model Catalog**: Picks the newest Solar model when none is configured
//! - **Retry with Backoff**: Transient chat failures are retried with exponential delays
//! - **Telemetry**: Embedding calls bracketed by input/output observations
//! - **Node Execution**: Fail-fast or continue-on-fail processing of host items
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use upstage_solar::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::from_env()?;
//!
//!     let embeddings = TracedEmbeddings::new(EmbeddingClient::from_config(&config)?, None);
//!     let vectors = embeddings
//!         .embed_many(&["first passage".to_string(), "second passage".to_string()])
//!         .await?;
//!     assert_eq!(vectors.len(), 2);
//!
//!     let chat = ChatClient::from_config(&config).await?;
//!     let reply = chat.prompt("Say hello").await?;
//!     println!("{}", reply.content);
//!
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod chat;
pub mod config;
pub mod credentials;
pub mod embedding;
pub mod error;
pub mod nodes;
pub mod provider;
pub mod retry;
pub mod telemetry;
pub mod validation;

pub use config::Config;
pub use error::{ProviderError, Result, SolarError};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::catalog::{rank, ModelCatalog, ModelOption};
    pub use crate::chat::{ChatClient, ChatCompletion, ChatMessage, ChatModel, ChatOptions, TokenUsage};
    pub use crate::config::Config;
    pub use crate::credentials::UpstageCredential;
    pub use crate::embedding::{EmbeddingClient, EmbeddingProvider};
    pub use crate::error::{ProviderError, Result, SolarError};
    pub use crate::nodes::{ChatNode, EmbeddingsNode, ExecutionMode, NodeItem, NodeOutput};
    pub use crate::provider::ProviderClient;
    pub use crate::retry::{with_retry, RetryPolicy};
    pub use crate::telemetry::{MetricsCollector, TelemetrySink, TracedEmbeddings, TracingSink};
    pub use crate::validation::{InputValidator, ValidationError};
}
