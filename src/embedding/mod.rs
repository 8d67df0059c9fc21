//! Embedding service for generating vector embeddings via the Upstage API

pub mod batcher;
pub mod client;
pub mod models;
pub mod normalize;

pub use batcher::Batcher;
pub use client::EmbeddingClient;
pub use models::{EmbeddingInput, EmbeddingModel, EmbeddingOutput, EmbeddingRequest, EmbeddingResponse, UsageStats};
pub use normalize::normalize;

use async_trait::async_trait;
use crate::error::Result;

/// Trait for embedding providers
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate the embedding for a single query text
    async fn embed_one(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for documents, one vector per text in input order
    async fn embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Model the embeddings are generated with
    fn model(&self) -> &str;
}
