use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::error::EmbeddingError;
use super::Embedder;

/// In-memory embedder returning deterministic vectors derived from the text.
///
/// Tracks call counts and supports failure injection for workflow tests.
pub struct MockEmbedder {
    dim: usize,
    calls: AtomicUsize,
    fail_with: Mutex<Option<String>>,
}

impl MockEmbedder {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            calls: AtomicUsize::new(0),
            fail_with: Mutex::new(None),
        }
    }

    /// Makes every subsequent `embed` call fail with `message`.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.fail_with.lock() = Some(message.into());
    }

    /// Number of `embed` calls observed.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn vector_for(&self, text: &str) -> Vec<f32> {
        let hash = blake3::hash(text.as_bytes());
        let bytes = hash.as_bytes();
        (0..self.dim)
            .map(|i| (bytes[i % bytes.len()] as f32 / 255.0) - 0.5)
            .collect()
    }
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::new(8)
    }
}

impl Embedder for MockEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = self.fail_with.lock().clone() {
            return Err(EmbeddingError::RequestFailed { message });
        }

        Ok(texts.iter().map(|t| self.vector_for(t)).collect())
    }
}
