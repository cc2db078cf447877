//! LLM-based candidate reranking.
//!
//! The reranker receives the student summary plus a lightweight candidate
//! projection and must return a total ordering with one scored entry per id.
//! Responses are validated against that contract at this boundary; violations
//! surface as [`RerankError::Contract`] and the workflow falls back to vector
//! order.

pub mod client;
pub mod error;
pub mod model;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

#[cfg(test)]
mod tests;

pub use client::{LlmReranker, Reranker, SCORE_RANGE};
pub use error::RerankError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockReranker;
pub use model::{CandidateBrief, RankedEntry};
