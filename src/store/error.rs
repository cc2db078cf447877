use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by candidate store operations.
pub enum StoreError {
    /// Could not connect to the Qdrant endpoint.
    #[error("failed to connect to Qdrant at '{url}': {message}")]
    ConnectionFailed {
        /// Endpoint URL.
        url: String,
        /// Error message.
        message: String,
    },

    /// Similarity search failed.
    #[error("failed to search collection '{collection}': {message}")]
    SearchFailed {
        /// Collection name.
        collection: String,
        /// Error message.
        message: String,
    },
}
