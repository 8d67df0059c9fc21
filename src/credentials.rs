//! Upstage API credential definition

use crate::config::ProviderConfig;
use reqwest::RequestBuilder;
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;

/// API key credential, sent as a bearer token
#[derive(Debug, Clone)]
pub struct UpstageCredential {
    api_key: Secret<String>,
}

/// Outcome of a credential connectivity check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CredentialTestResult {
    pub ok: bool,
    pub message: String,
}

impl UpstageCredential {
    /// Name the credential is registered under on the host
    pub const NAME: &'static str = "upstageApi";

    /// Display name shown to users
    pub const DISPLAY_NAME: &'static str = "Upstage API";

    /// Endpoint used to verify the key
    pub const TEST_PATH: &'static str = "/models";

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
        }
    }

    pub fn from_config(config: &ProviderConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
        }
    }

    /// Attach the `Authorization: Bearer` header
    pub fn authenticate(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(self.api_key.expose_secret())
    }

    pub fn is_empty(&self) -> bool {
        self.api_key.expose_secret().trim().is_empty()
    }
}

impl CredentialTestResult {
    pub fn success() -> Self {
        Self {
            ok: true,
            message: "Connection successful".to_string(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}
