use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by the embedding boundary.
pub enum EmbeddingError {
    /// The HTTP request itself failed (connect, timeout, transport).
    #[error("embedding request failed: {message}")]
    RequestFailed {
        /// Error message.
        message: String,
    },

    /// The endpoint answered with a non-success status.
    #[error("embedding endpoint returned {status}: {message}")]
    BadStatus {
        /// HTTP status code.
        status: u16,
        /// Response body excerpt.
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("malformed embedding response: {message}")]
    MalformedResponse {
        /// Error message.
        message: String,
    },

    /// The endpoint returned a different number of vectors than texts sent.
    #[error("embedding count mismatch: expected {expected}, got {actual}")]
    CountMismatch {
        /// Number of input texts.
        expected: usize,
        /// Number of returned vectors.
        actual: usize,
    },
}
