use thiserror::Error;

#[derive(Debug, Error)]
/// Fatal match workflow failures surfaced to the caller.
///
/// Reranker failures are deliberately absent: they degrade to vector order
/// inside the workflow and never fail a request.
pub enum WorkflowError {
    /// The student summary was empty after trimming. No external call was made.
    #[error("student_summary must not be empty")]
    EmptySummary,

    /// The embedder failed; nothing downstream can proceed without a query vector.
    #[error("embedding failed: {0}")]
    Embed(String),

    /// Candidate retrieval failed.
    #[error("retrieval failed: {0}")]
    Retrieve(String),
}

impl WorkflowError {
    /// Returns `true` for failures detected before any external call.
    #[inline]
    pub fn is_validation(&self) -> bool {
        matches!(self, WorkflowError::EmptySummary)
    }
}
