//! HTTP transport shared by the embeddings, chat and model-listing clients

use crate::config::ProviderConfig;
use crate::credentials::{CredentialTestResult, UpstageCredential};
use crate::error::ProviderError;
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Authenticated client for the Upstage REST API
#[derive(Debug, Clone)]
pub struct ProviderClient {
    config: ProviderConfig,
    credential: UpstageCredential,
    http_client: Client,
}

impl ProviderClient {
    /// Create a new provider client
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(10)
            .build()?;

        info!("Initialized Upstage client for {}", config.base_url);
        Ok(Self::with_http_client(config, http_client))
    }

    /// Create client with custom HTTP client
    pub fn with_http_client(config: ProviderConfig, http_client: Client) -> Self {
        let credential = UpstageCredential::from_config(&config);
        Self {
            config,
            credential,
            http_client,
        }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// POST a JSON body and return the raw success body
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<String, ProviderError> {
        let url = self.config.endpoint(path);
        debug!("POST {}", url);
        self.send(self.http_client.post(&url).json(body)).await
    }

    /// GET an endpoint and return the raw success body
    pub async fn get(&self, path: &str) -> Result<String, ProviderError> {
        let url = self.config.endpoint(path);
        debug!("GET {}", url);
        self.send(self.http_client.get(&url)).await
    }

    /// Verify the credential by listing models
    pub async fn test_credential(&self) -> CredentialTestResult {
        if self.credential.is_empty() {
            return CredentialTestResult::failure("API key is empty");
        }

        match self.get(UpstageCredential::TEST_PATH).await {
            Ok(_) => CredentialTestResult::success(),
            Err(e) => {
                warn!("Credential test failed: {}", e);
                CredentialTestResult::failure(e.to_string())
            }
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<String, ProviderError> {
        let response = self
            .credential
            .authenticate(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            error!("Upstage API error response {}: {}", status, body);
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }

    fn transport_error(&self, err: reqwest::Error) -> ProviderError {
        if err.is_timeout() {
            ProviderError::Timeout(self.config.timeout_secs)
        } else {
            ProviderError::Network(err)
        }
    }
}
