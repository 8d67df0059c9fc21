//! Data models for embedding requests and responses

use crate::error::ProviderError;
use serde::{Deserialize, Serialize};

/// Embedding models offered by default
pub const EMBEDDING_MODELS: &[EmbeddingModel] = &[
    EmbeddingModel {
        id: "embedding-query",
        name: "Embedding Query (Alias)",
        description: "Optimized for search queries - points to latest query model",
    },
    EmbeddingModel {
        id: "embedding-passage",
        name: "Embedding Passage (Alias)",
        description: "Optimized for document passages - points to latest passage model",
    },
    EmbeddingModel {
        id: "solar-embedding-1-large-query",
        name: "Solar Embedding 1 Large Query",
        description: "Specific version for query embeddings",
    },
    EmbeddingModel {
        id: "solar-embedding-1-large-passage",
        name: "Solar Embedding 1 Large Passage",
        description: "Specific version for passage embeddings",
    },
];

/// A known embedding model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbeddingModel {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

impl EmbeddingModel {
    /// Look up a known model by id
    pub fn find(id: &str) -> Option<&'static EmbeddingModel> {
        EMBEDDING_MODELS.iter().find(|m| m.id == id)
    }
}

/// Request to generate embeddings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRequest {
    /// Model name
    pub model: String,

    /// Input text(s) to embed
    pub input: EmbeddingInput,
}

/// Input variants for embedding requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmbeddingInput {
    Single(String),
    Batch(Vec<String>),
}

impl EmbeddingInput {
    pub fn len(&self) -> usize {
        match self {
            EmbeddingInput::Single(_) => 1,
            EmbeddingInput::Batch(texts) => texts.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Response from embedding generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingResponse {
    /// Generated embeddings
    pub data: Vec<EmbeddingData>,

    /// Model used for generation
    #[serde(default)]
    pub model: Option<String>,

    /// Usage statistics
    #[serde(default)]
    pub usage: Option<UsageStats>,
}

/// Individual embedding data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingData {
    /// Embedding vector
    pub embedding: Vec<f32>,

    /// Index in the batch
    pub index: usize,
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageStats {
    /// Number of prompt tokens
    #[serde(default)]
    pub prompt_tokens: u64,

    /// Total tokens used
    #[serde(default)]
    pub total_tokens: u64,
}

impl UsageStats {
    pub fn add(&mut self, other: &UsageStats) {
        self.prompt_tokens += other.prompt_tokens;
        self.total_tokens += other.total_tokens;
    }
}

/// Vectors in input order, with the usage summed across batches
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmbeddingOutput {
    pub embeddings: Vec<Vec<f32>>,
    pub usage: UsageStats,
}

impl EmbeddingRequest {
    /// Build a request for one batch. A single text goes out as a bare string,
    /// several texts as a list.
    pub fn for_batch(model: impl Into<String>, mut texts: Vec<String>) -> Self {
        let input = if texts.len() == 1 {
            EmbeddingInput::Single(texts.remove(0))
        } else {
            EmbeddingInput::Batch(texts)
        };

        Self {
            model: model.into(),
            input,
        }
    }
}

impl EmbeddingResponse {
    /// Decode a response body, rejecting payloads without a `data` array
    pub fn parse(body: &str) -> Result<Self, ProviderError> {
        let value: serde_json::Value = serde_json::from_str(body)
            .map_err(|e| ProviderError::Protocol(format!("response is not valid JSON: {}", e)))?;

        if !value.get("data").map(|d| d.is_array()).unwrap_or(false) {
            return Err(ProviderError::Protocol("missing `data` array".to_string()));
        }

        serde_json::from_value(value)
            .map_err(|e| ProviderError::Protocol(format!("malformed embedding item: {}", e)))
    }

    /// Order vectors by their declared index, checking they cover `0..expected` exactly
    pub fn into_ordered(self, expected: usize) -> Result<(Vec<Vec<f32>>, UsageStats), ProviderError> {
        if self.data.len() != expected {
            return Err(ProviderError::Protocol(format!(
                "Expected {} embeddings, got {}",
                expected,
                self.data.len()
            )));
        }

        let mut data = self.data;
        data.sort_by_key(|item| item.index);

        for (position, item) in data.iter().enumerate() {
            if item.index != position {
                return Err(ProviderError::Protocol(format!(
                    "embedding index {} is duplicated or out of range for {} inputs",
                    item.index, expected
                )));
            }
        }

        let usage = self.usage.unwrap_or_default();
        Ok((data.into_iter().map(|item| item.embedding).collect(), usage))
    }
}
