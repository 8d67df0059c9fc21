//! Splits ordered texts into provider-sized batches

use crate::validation::{InputValidator, ValidationError};

/// Partitions texts into contiguous batches of at most `batch_size`
#[derive(Debug, Clone, Copy)]
pub struct Batcher {
    batch_size: usize,
}

impl Batcher {
    /// Create a batcher; the size must be within 1..=100
    pub fn new(batch_size: usize) -> Result<Self, ValidationError> {
        InputValidator::validate_batch_size(batch_size)?;
        Ok(Self { batch_size })
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Lazily yield batches covering `texts` exactly once, in order.
    ///
    /// Each call starts over from the beginning of the slice.
    pub fn batches<'a>(&self, texts: &'a [String]) -> std::slice::Chunks<'a, String> {
        texts.chunks(self.batch_size)
    }

    /// Number of batches `texts` will be split into
    pub fn batch_count(&self, len: usize) -> usize {
        len.div_ceil(self.batch_size)
    }
}
