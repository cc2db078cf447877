use crate::store::{CandidateRow, EligibilityFilter};

/// Result count used when the caller does not specify `k`.
pub const DEFAULT_K: usize = 20;

/// Inclusive bounds the requested `k` is clamped into.
pub const MATCH_K_RANGE: std::ops::RangeInclusive<usize> = 1..=50;

/// Minimum candidate count for reranking; below this the workflow returns the
/// vector order directly since reranking adds latency without improving a tiny set.
pub const MIN_RERANK_CANDIDATES: usize = 3;

/// A match request, immutable once accepted.
#[derive(Debug, Clone)]
pub struct MatchRequest {
    /// Free text describing the student. Must be non-empty after trimming.
    pub student_summary: String,
    /// Student GPA; restricts candidates to those the student qualifies for.
    pub min_gpa: Option<f32>,
    /// Desired result count; clamped to [`MATCH_K_RANGE`], default [`DEFAULT_K`].
    pub k: Option<i64>,
    /// Whether LLM reranking is wanted. Defaults to `true`.
    pub use_reranker: bool,
    /// Structured eligibility predicates passed through to the store.
    pub eligibility: Option<EligibilityFilter>,
}

impl MatchRequest {
    /// Builds a request with defaults for everything but the summary.
    pub fn new(student_summary: impl Into<String>) -> Self {
        Self {
            student_summary: student_summary.into(),
            min_gpa: None,
            k: None,
            use_reranker: true,
            eligibility: None,
        }
    }
}

/// Clamps the requested result count into [`MATCH_K_RANGE`].
pub fn clamp_k(requested: Option<i64>) -> usize {
    match requested {
        None => DEFAULT_K,
        Some(k) => k.clamp(*MATCH_K_RANGE.start() as i64, *MATCH_K_RANGE.end() as i64) as usize,
    }
}

/// Per-stage timings and the rerank outcome for a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchMeta {
    /// `true` only when the rows carry a rerank ordering (fresh or cached).
    pub used_reranker: bool,
    pub total_ms: u64,
    pub embed_ms: u64,
    pub retrieve_ms: u64,
    /// Absent when reranking was skipped or fell back; `0` on a cache hit.
    pub rerank_ms: Option<u64>,
}

/// A successful match run: ranked rows plus timing metadata.
#[derive(Debug, Clone)]
pub struct MatchSuccess {
    pub rows: Vec<CandidateRow>,
    pub meta: MatchMeta,
}
