use serde::{Deserialize, Serialize};

use crate::store::CandidateRow;

/// Lightweight candidate projection sent to the reranker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateBrief {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

impl CandidateBrief {
    /// Projects a retrieved row down to the fields the reranker sees.
    pub fn from_row(row: &CandidateRow) -> Self {
        Self {
            id: row.id.clone(),
            name: row.name.clone(),
            snippet: row.snippet.clone(),
        }
    }
}

/// One entry of the reranker's total ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub id: String,
    /// Relevance in `[0, 100]`.
    pub score: f32,
    /// Short human-readable justification.
    pub rationale: String,
}
