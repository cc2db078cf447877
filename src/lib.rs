//! Scholarmatch library crate (used by the server binary and integration tests).
//!
//! # Public API Surface
//!
//! The exports are organized by module:
//!
//! ## Core Types (Stable)
//! - [`Config`], [`ConfigError`] - Server configuration
//! - [`MatchRequest`], [`MatchSuccess`], [`MatchWorkflow`] - Match pipeline
//! - [`CandidateRow`], [`EligibilityFilter`] - Candidate store model
//!
//! ## Collaborator Boundaries
//! - [`Embedder`], [`HttpEmbedder`] - Text embedding
//! - [`CandidateStore`], [`ScholarshipStore`] - Vector similarity retrieval
//! - [`Reranker`], [`LlmReranker`] - LLM-based candidate reranking
//!
//! ## Infrastructure
//! - [`TtlCache`] - Per-entry TTL cache for rerank results
//! - [`TelemetrySink`], [`TelemetryEvent`] - Bounded pipeline telemetry
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod cache;
pub mod config;
pub mod embedding;
pub mod gateway;
pub mod rerank;
pub mod store;
pub mod telemetry;
pub mod workflow;

pub use cache::{DEFAULT_RERANK_CACHE_CAPACITY, RERANK_KEY_SCHEMA_VERSION, TtlCache, rerank_cache_key};
pub use config::{Config, ConfigError};
#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEmbedder;
pub use embedding::{Embedder, EmbeddingError, HttpEmbedder};
pub use gateway::{HandlerState, create_router_with_state};
#[cfg(any(test, feature = "mock"))]
pub use rerank::MockReranker;
pub use rerank::{CandidateBrief, LlmReranker, RankedEntry, RerankError, Reranker};
#[cfg(any(test, feature = "mock"))]
pub use store::MockCandidateStore;
pub use store::{CandidateRow, CandidateStore, EligibilityFilter, ScholarshipStore, StoreError};
pub use telemetry::{DEFAULT_TELEMETRY_CAPACITY, PipelineStep, TelemetryEvent, TelemetrySink};
pub use workflow::{
    DEFAULT_K, MATCH_K_RANGE, MIN_RERANK_CANDIDATES, MatchMeta, MatchRequest, MatchSuccess,
    MatchWorkflow, RerankCache, WorkflowError, WorkflowOptions, clamp_k,
};
