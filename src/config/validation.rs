//! Configuration validation

use super::*;
use crate::error::{SolarError, Result};
use crate::validation::{InputValidator, ValidationError};

/// Validate complete configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_provider_config(&config.provider)?;
    validate_embedding_config(&config.embedding)?;
    validate_chat_config(&config.chat)?;
    validate_retry_config(&config.retry)?;
    Ok(())
}

/// Validate provider configuration
fn validate_provider_config(config: &ProviderConfig) -> Result<()> {
    if config.api_key.expose_secret().trim().is_empty() {
        return Err(SolarError::Config(
            "Upstage API key is required".to_string()
        ));
    }

    if !config.base_url.starts_with("http://") && !config.base_url.starts_with("https://") {
        return Err(SolarError::Config(
            "Base URL must start with http:// or https://".to_string()
        ));
    }

    if config.timeout_secs == 0 {
        return Err(SolarError::Config(
            "Request timeout must be greater than 0".to_string()
        ));
    }

    if config.timeout_secs > 600 {
        return Err(SolarError::Config(
            "Request timeout too large (max: 600 seconds)".to_string()
        ));
    }

    if config.chat_path.is_empty() {
        return Err(SolarError::Config(
            "Chat completions path cannot be empty".to_string()
        ));
    }

    Ok(())
}

/// Validate embedding configuration
fn validate_embedding_config(config: &EmbeddingConfig) -> Result<()> {
    if config.model.trim().is_empty() {
        return Err(SolarError::Config(
            "Embedding model cannot be empty".to_string()
        ));
    }

    InputValidator::validate_batch_size(config.batch_size).map_err(invalid)?;
    Ok(())
}

/// Validate chat sampling defaults
fn validate_chat_config(config: &ChatConfig) -> Result<()> {
    InputValidator::validate_range("temperature", config.temperature as f64, 0.0, 2.0)
        .map_err(invalid)?;

    if let Some(top_p) = config.top_p {
        InputValidator::validate_range("top_p", top_p as f64, 0.0, 1.0).map_err(invalid)?;
    }

    if let Some(max_tokens) = config.max_tokens {
        InputValidator::validate_range("max_tokens", max_tokens as f64, 1.0, 32768.0)
            .map_err(invalid)?;
    }

    for (name, penalty) in [
        ("frequency_penalty", config.frequency_penalty),
        ("presence_penalty", config.presence_penalty),
    ] {
        if let Some(value) = penalty {
            InputValidator::validate_range(name, value as f64, -2.0, 2.0).map_err(invalid)?;
        }
    }

    if let Some(effort) = &config.reasoning_effort {
        if !matches!(effort.as_str(), "low" | "medium" | "high") {
            return Err(SolarError::Config(format!(
                "reasoning_effort must be low, medium or high, got {}",
                effort
            )));
        }
    }

    Ok(())
}

/// Validate retry configuration
fn validate_retry_config(config: &RetryConfig) -> Result<()> {
    if config.max_retries > 10 {
        return Err(SolarError::Config(
            "Max retries too large (max: 10)".to_string()
        ));
    }

    if config.base_delay_ms == 0 {
        return Err(SolarError::Config(
            "Base retry delay must be greater than 0".to_string()
        ));
    }

    if config.base_delay_ms > config.max_delay_ms {
        return Err(SolarError::Config(format!(
            "Base retry delay ({}ms) exceeds max delay ({}ms)",
            config.base_delay_ms, config.max_delay_ms
        )));
    }

    Ok(())
}

fn invalid(err: ValidationError) -> SolarError {
    SolarError::Config(err.to_string())
}
