//! Embedding client for the Upstage API

use super::batcher::Batcher;
use super::models::*;
use super::normalize::{normalize, normalize_all};
use super::EmbeddingProvider;
use crate::config::{Config, EmbeddingConfig};
use crate::error::{ProviderError, Result, SolarError};
use crate::provider::ProviderClient;
use crate::validation::InputValidator;
use async_trait::async_trait;
use tracing::{debug, info};

const EMBEDDINGS_PATH: &str = "/embeddings";

/// Client for generating embeddings via the Upstage API.
///
/// Texts are normalized, split into batches and sent one batch at a time;
/// results come back in input order.
#[derive(Debug, Clone)]
pub struct EmbeddingClient {
    config: EmbeddingConfig,
    provider: ProviderClient,
    batcher: Batcher,
}

impl EmbeddingClient {
    /// Create a new embedding client
    pub fn new(provider: ProviderClient, config: EmbeddingConfig) -> Result<Self> {
        let batcher = Batcher::new(config.batch_size)
            .map_err(|e| SolarError::Embedding(e.into()))?;

        info!(
            "Initialized embedding client model={} batch_size={} strip_newlines={}",
            config.model, config.batch_size, config.strip_newlines
        );

        Ok(Self {
            config,
            provider,
            batcher,
        })
    }

    /// Create a client from full configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let provider = ProviderClient::new(config.provider.clone()).map_err(SolarError::Embedding)?;
        Self::new(provider, config.embedding.clone())
    }

    pub fn config(&self) -> &EmbeddingConfig {
        &self.config
    }

    /// Send one batch and return its vectors in request order.
    ///
    /// Blank entries are dropped before sending; the rest are trimmed.
    pub async fn request_batch(
        &self,
        batch: &[String],
    ) -> std::result::Result<(Vec<Vec<f32>>, UsageStats), ProviderError> {
        let clean = InputValidator::clean_batch(batch)?;
        let expected = clean.len();

        debug!(
            "Upstage embeddings request model={} input_count={} input_sample={}",
            self.config.model,
            expected,
            sample(&clean[0])
        );

        let request = EmbeddingRequest::for_batch(self.config.model.clone(), clean);
        let body = self.provider.post_json(EMBEDDINGS_PATH, &request).await?;
        let response = EmbeddingResponse::parse(&body)?;

        debug!(
            "Upstage embeddings response model={:?} usage={:?} data_count={}",
            response.model,
            response.usage,
            response.data.len()
        );

        response.into_ordered(expected)
    }

    /// Embed texts in order, also returning token usage summed over batches
    pub async fn embed_many_with_usage(&self, texts: &[String]) -> Result<EmbeddingOutput> {
        InputValidator::validate_texts(texts).map_err(|e| SolarError::Embedding(e.into()))?;

        let processed = normalize_all(texts, self.config.strip_newlines);
        let mut output = EmbeddingOutput {
            embeddings: Vec::with_capacity(processed.len()),
            usage: UsageStats::default(),
        };

        debug!(
            "Embedding {} texts in {} batches",
            processed.len(),
            self.batcher.batch_count(processed.len())
        );

        for batch in self.batcher.batches(&processed) {
            let (vectors, usage) = self
                .request_batch(batch)
                .await
                .map_err(SolarError::Embedding)?;
            output.embeddings.extend(vectors);
            output.usage.add(&usage);
        }

        Ok(output)
    }
}

#[async_trait]
impl EmbeddingProvider for EmbeddingClient {
    async fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let processed = normalize(text, self.config.strip_newlines).into_owned();
        InputValidator::validate_texts(std::slice::from_ref(&processed))
            .map_err(|e| SolarError::Embedding(e.into()))?;

        let (vectors, _) = self
            .request_batch(std::slice::from_ref(&processed))
            .await
            .map_err(SolarError::Embedding)?;

        vectors
            .into_iter()
            .next()
            .ok_or_else(|| SolarError::Embedding(ProviderError::Protocol("No embedding in response".to_string())))
    }

    async fn embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(self.embed_many_with_usage(texts).await?.embeddings)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

/// First 100 characters of a text, for logging
fn sample(text: &str) -> String {
    let mut out: String = text.chars().take(100).collect();
    if text.chars().count() > 100 {
        out.push_str("...");
    }
    out
}
