//! The match workflow orchestrator.
//!
//! Turns a free-text student summary into a ranked, bounded list of
//! scholarship candidates: validate, embed, retrieve top-k by similarity,
//! then optionally rerank through the cache with silent fallback.

pub mod engine;
pub mod error;
pub mod model;


pub use engine::{MatchWorkflow, RerankCache, WorkflowOptions};
pub use error::WorkflowError;
pub use model::{
    DEFAULT_K, MATCH_K_RANGE, MIN_RERANK_CANDIDATES, MatchMeta, MatchRequest, MatchSuccess,
    clamp_k,
};
