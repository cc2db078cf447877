//! Text embedding boundary.
//!
//! [`Embedder`] turns a batch of texts into fixed-length vectors, one per text,
//! same order. The production implementation calls an OpenAI-compatible
//! `/v1/embeddings` endpoint over HTTP.

pub mod client;
pub mod error;

#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use client::HttpEmbedder;
pub use error::EmbeddingError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbedder;

/// Minimal async interface used by the match workflow.
pub trait Embedder: Send + Sync {
    /// Embeds `texts`, returning one vector per text in input order.
    fn embed(
        &self,
        texts: &[String],
    ) -> impl std::future::Future<Output = Result<Vec<Vec<f32>>, EmbeddingError>> + Send;
}

impl<T: Embedder> Embedder for std::sync::Arc<T> {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        (**self).embed(texts).await
    }
}
