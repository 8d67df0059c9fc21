//! Retry and backoff policy for provider calls

use crate::config::RetryConfig;
use crate::error::ProviderError;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// What to do after a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Wait for the delay, then try again
    Retry(Duration),
    /// Give up and surface the error
    Fail,
}

/// Exponential backoff: `min(base * 2^(attempt-1), max)`
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_retries: u32,
    base_delay_ms: u64,
    max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(&RetryConfig::default())
    }
}

impl RetryPolicy {
    pub fn new(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay_ms: config.base_delay_ms,
            max_delay_ms: config.max_delay_ms,
        }
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Delay before retrying after the given 1-based attempt
    pub fn compute_delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.max(1) - 1;
        let delay = self
            .base_delay_ms
            .saturating_mul(2_u64.saturating_pow(exponent))
            .min(self.max_delay_ms);
        Duration::from_millis(delay)
    }

    /// Connection resets, timeouts, 5xx and 429 are transient
    pub fn is_retryable(error: &ProviderError) -> bool {
        match error {
            ProviderError::Timeout(_) => true,
            ProviderError::Network(e) => {
                e.is_timeout()
                    || e.is_connect()
                    || e.is_request()
                    || e.status().map(|s| is_retryable_status(s.as_u16())).unwrap_or(false)
            }
            ProviderError::Api { status, .. } => is_retryable_status(*status),
            ProviderError::Validation(_)
            | ProviderError::Protocol(_)
            | ProviderError::Serialization(_) => false,
        }
    }

    /// Decide whether the 1-based `attempt` that failed with `error` is retried
    pub fn decide(&self, error: &ProviderError, attempt: u32) -> RetryDecision {
        if Self::is_retryable(error) && attempt <= self.max_retries {
            RetryDecision::Retry(self.compute_delay(attempt))
        } else {
            RetryDecision::Fail
        }
    }
}

fn is_retryable_status(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}

/// Run `operation` until it succeeds or the policy gives up
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, mut operation: F) -> Result<T, ProviderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    let mut attempt = 0;

    loop {
        attempt += 1;

        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!("Request succeeded on attempt {}", attempt);
                }
                return Ok(value);
            }
            Err(e) => match policy.decide(&e, attempt) {
                RetryDecision::Retry(delay) => {
                    warn!(
                        "Solar LLM retry attempt {} after {}ms: {}",
                        attempt,
                        delay.as_millis(),
                        e
                    );
                    tokio::time::sleep(delay).await;
                }
                RetryDecision::Fail => return Err(e),
            },
        }
    }
}
