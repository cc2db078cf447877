use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by the reranking boundary.
///
/// All variants are degradable: the workflow falls back to vector order
/// instead of failing the request.
pub enum RerankError {
    /// The LLM provider call failed.
    #[error("rerank provider error: {message}")]
    Provider {
        /// Error message.
        message: String,
    },

    /// The provider did not answer within the configured timeout.
    #[error("rerank call timed out after {timeout:?}")]
    Timeout {
        /// Configured timeout.
        timeout: Duration,
    },

    /// The provider returned an empty completion.
    #[error("rerank provider returned an empty completion")]
    EmptyCompletion,

    /// The completion was not parseable as a ranking payload.
    #[error("malformed ranking payload: {message}")]
    Malformed {
        /// Error message.
        message: String,
    },

    /// The parsed ranking violated the contract (coverage, uniqueness, score range).
    #[error("ranking contract violation: {message}")]
    Contract {
        /// Violation description.
        message: String,
    },
}
