//! Error types for the Solar client

use thiserror::Error;

pub use crate::validation::ValidationError;

/// Result type alias for crate-level operations
pub type Result<T> = std::result::Result<T, SolarError>;

/// Main error type, naming the operation that failed
#[derive(Error, Debug)]
pub enum SolarError {
    #[error("Failed to generate embeddings: {0}")]
    Embedding(#[source] ProviderError),

    #[error("Chat completion failed: {0}")]
    Chat(#[source] ProviderError),

    #[error("Failed to list models: {0}")]
    Models(#[source] ProviderError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SolarError {
    /// The provider-level cause, if this error came from a provider call
    pub fn provider_error(&self) -> Option<&ProviderError> {
        match self {
            SolarError::Embedding(e) | SolarError::Chat(e) | SolarError::Models(e) => Some(e),
            SolarError::Config(_) | SolarError::Internal(_) => None,
        }
    }
}

/// Errors raised while talking to the provider API
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("Upstage API error: {status} - {body}")]
    Api { status: u16, body: String },

    #[error("Invalid response format from Upstage API: {0}")]
    Protocol(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ProviderError {
    /// HTTP status carried by an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Api { status, .. } => Some(*status),
            ProviderError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<config::ConfigError> for SolarError {
    fn from(err: config::ConfigError) -> Self {
        SolarError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_error_names_operation() {
        let err = SolarError::Embedding(ProviderError::Api {
            status: 400,
            body: "bad input".to_string(),
        });

        assert_eq!(
            err.to_string(),
            "Failed to generate embeddings: Upstage API error: 400 - bad input"
        );
        assert_eq!(err.provider_error().and_then(|e| e.status()), Some(400));
    }

    #[test]
    fn test_validation_converts_to_provider_error() {
        let err: ProviderError = ValidationError::EmptyInput.into();
        assert!(matches!(err, ProviderError::Validation(ValidationError::EmptyInput)));
        assert_eq!(err.status(), None);
    }
}
