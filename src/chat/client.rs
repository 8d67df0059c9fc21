//! Chat completion client for Solar models

use super::models::{ChatCompletion, ChatMessage, ChatOptions, ChatRequest};
use super::sse::aggregate_stream;
use super::ChatModel;
use crate::catalog::ModelCatalog;
use crate::config::{ChatConfig, Config};
use crate::error::{ProviderError, Result, SolarError};
use crate::provider::ProviderClient;
use crate::retry::{with_retry, RetryPolicy};
use crate::validation::ValidationError;
use async_trait::async_trait;
use tracing::{debug, info, info_span, Instrument};

/// Client for `chat/completions`
#[derive(Debug, Clone)]
pub struct ChatClient {
    provider: ProviderClient,
    config: ChatConfig,
    model: String,
    retry: RetryPolicy,
}

impl ChatClient {
    /// Create a client bound to a concrete model
    pub fn new(
        provider: ProviderClient,
        model: impl Into<String>,
        config: ChatConfig,
        retry: RetryPolicy,
    ) -> Self {
        let model = model.into();
        info!("Initialized Solar chat client model={}", model);

        Self {
            provider,
            config,
            model,
            retry,
        }
    }

    /// Create a client from full configuration, resolving the model when unset
    pub async fn from_config(config: &Config) -> Result<Self> {
        let provider = ProviderClient::new(config.provider.clone()).map_err(SolarError::Chat)?;
        let model = ModelCatalog::new(provider.clone())
            .resolve(config.chat.model.as_deref())
            .await;

        Ok(Self::new(
            provider,
            model,
            config.chat.clone(),
            RetryPolicy::new(&config.retry),
        ))
    }

    /// Options taken from the client's configuration
    pub fn default_options(&self) -> ChatOptions {
        ChatOptions::from_config(&self.config)
    }

    /// Send a single user prompt with the configured options
    pub async fn prompt(&self, text: &str) -> Result<ChatCompletion> {
        self.complete(&[ChatMessage::user(text)], &self.default_options())
            .await
    }

    async fn send(
        &self,
        model: &str,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> std::result::Result<ChatCompletion, ProviderError> {
        let request = ChatRequest::new(model, messages, options);
        let request = &request;
        let path = self.provider.config().chat_path.as_str();
        let provider = &self.provider;

        let body = with_retry(&self.retry, move || provider.post_json(path, request)).await?;

        let raw = if options.stream {
            aggregate_stream(&body)?
        } else {
            serde_json::from_str(&body)
                .map_err(|e| ProviderError::Protocol(format!("response is not valid JSON: {}", e)))?
        };

        ChatCompletion::from_value(raw)
    }
}

#[async_trait]
impl ChatModel for ChatClient {
    async fn complete(&self, messages: &[ChatMessage], options: &ChatOptions) -> Result<ChatCompletion> {
        if messages.is_empty() {
            return Err(SolarError::Chat(ValidationError::NoMessages.into()));
        }
        options
            .validate()
            .map_err(|e| SolarError::Chat(e.into()))?;

        let model = options.model.as_deref().unwrap_or(&self.model);
        let span = info_span!(
            "chat_completion",
            provider = "upstage",
            model_type = "solar",
            model = %model
        );

        async {
            debug!("Sending {} messages stream={}", messages.len(), options.stream);
            let result = self
                .send(model, messages, options)
                .await
                .map_err(SolarError::Chat);

            if let Ok(completion) = &result {
                info!(
                    "Chat completion finished tokens prompt={} completion={} total={}",
                    completion.usage.prompt_tokens,
                    completion.usage.completion_tokens,
                    completion.usage.total_tokens
                );
            }
            result
        }
        .instrument(span)
        .await
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;

    fn client() -> ChatClient {
        let provider = ProviderClient::with_http_client(
            ProviderConfig::with_api_key("test"),
            reqwest::Client::new(),
        );
        ChatClient::new(provider, "solar-pro", ChatConfig::default(), RetryPolicy::default())
    }

    #[tokio::test]
    async fn test_rejects_empty_conversation() {
        let err = client()
            .complete(&[], &ChatOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SolarError::Chat(ProviderError::Validation(ValidationError::NoMessages))
        ));
    }

    #[tokio::test]
    async fn test_rejects_out_of_range_option_before_network() {
        let options = ChatOptions {
            temperature: Some(3.0),
            ..ChatOptions::default()
        };
        let err = client()
            .complete(&[ChatMessage::user("hi")], &options)
            .await
            .unwrap_err();
        assert!(matches!(err, SolarError::Chat(ProviderError::Validation(_))));
    }

    #[test]
    fn test_default_options_follow_config() {
        let options = client().default_options();
        assert_eq!(options.temperature, Some(0.7));
        assert!(!options.stream);
        assert_eq!(client().model(), "solar-pro");
    }
}
