//! Input validation for embedding and chat requests

use tracing::{debug, warn};

/// Maximum number of strings the embeddings endpoint accepts per request
pub const MAX_BATCH_SIZE: usize = 100;

/// Texts longer than this (~4000 tokens at 4 chars/token) are likely to be rejected
pub const LONG_TEXT_CHARS: usize = 16_000;

/// Input validator
pub struct InputValidator;

impl InputValidator {
    /// Drop blank entries, trim the rest and enforce the per-request limits
    pub fn clean_batch(texts: &[String]) -> Result<Vec<String>, ValidationError> {
        let cleaned: Vec<String> = texts
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();

        if cleaned.is_empty() {
            warn!("Validation failed: no valid input texts");
            return Err(ValidationError::EmptyInput);
        }

        if cleaned.len() > MAX_BATCH_SIZE {
            warn!("Validation failed: batch too large ({} > {})", cleaned.len(), MAX_BATCH_SIZE);
            return Err(ValidationError::BatchTooLarge {
                size: cleaned.len(),
                max_size: MAX_BATCH_SIZE,
            });
        }

        for text in &cleaned {
            Self::check_text_length(text);
        }

        debug!("Batch validation passed ({} texts)", cleaned.len());
        Ok(cleaned)
    }

    /// Reject blank texts, reporting the position of the first one
    pub fn validate_texts(texts: &[String]) -> Result<(), ValidationError> {
        match texts.iter().position(|t| t.trim().is_empty()) {
            Some(index) => {
                warn!("Validation failed: blank text at index {}", index);
                Err(ValidationError::BlankText { index })
            }
            None => Ok(()),
        }
    }

    /// Warn about texts that will probably exceed the provider token limit
    pub fn check_text_length(text: &str) {
        let length = text.chars().count();
        if length > LONG_TEXT_CHARS {
            let sample: String = text.chars().take(100).collect();
            warn!("Text length {} might exceed token limit: {}...", length, sample);
        }
    }

    /// Validate a configured batch size
    pub fn validate_batch_size(size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            warn!("Validation failed: zero batch size");
            return Err(ValidationError::InvalidBatchSize);
        }

        if size > MAX_BATCH_SIZE {
            warn!("Validation failed: batch size too large ({} > {})", size, MAX_BATCH_SIZE);
            return Err(ValidationError::BatchTooLarge {
                size,
                max_size: MAX_BATCH_SIZE,
            });
        }

        Ok(())
    }

    /// Validate that a numeric option lies within an inclusive range
    pub fn validate_range(
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    ) -> Result<(), ValidationError> {
        if !(min..=max).contains(&value) {
            warn!("Validation failed: {} = {} outside [{}, {}]", name, value, min, max);
            return Err(ValidationError::OutOfRange { name, value, min, max });
        }
        Ok(())
    }
}

/// Validation errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("No valid input texts provided for embedding")]
    EmptyInput,

    #[error("Text at index {index} is empty")]
    BlankText { index: usize },

    #[error("Too many texts: {size}. Upstage API supports max {max_size} strings per request")]
    BatchTooLarge { size: usize, max_size: usize },

    #[error("Batch size must be greater than 0")]
    InvalidBatchSize,

    #[error("{name} must be between {min} and {max}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("At least one chat message is required")]
    NoMessages,
}
