//! Wire payloads for the match endpoint.
//!
//! Request fields are snake_case; response meta fields are camelCase for the
//! existing frontend consumers.

use serde::{Deserialize, Serialize};

use crate::store::{CandidateRow, EligibilityFilter};
use crate::workflow::{MatchMeta, MatchRequest, MatchSuccess};

/// `POST /v1/match` request body.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchRequestBody {
    pub student_summary: String,
    #[serde(default)]
    pub min_gpa: Option<f32>,
    #[serde(default)]
    pub k: Option<i64>,
    /// Absent means reranking is wanted.
    #[serde(default)]
    pub use_reranker: Option<bool>,
    #[serde(default)]
    pub eligibility: Option<EligibilityFilter>,
}

impl From<MatchRequestBody> for MatchRequest {
    fn from(body: MatchRequestBody) -> Self {
        MatchRequest {
            student_summary: body.student_summary,
            min_gpa: body.min_gpa,
            k: body.k,
            use_reranker: body.use_reranker.unwrap_or(true),
            eligibility: body.eligibility.filter(|e| !e.is_empty()),
        }
    }
}

/// One scholarship row on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct RowBody {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_gpa: Option<f32>,
    pub distance: f32,
    pub dot_sim: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
}

impl From<CandidateRow> for RowBody {
    fn from(row: CandidateRow) -> Self {
        RowBody {
            id: row.id,
            name: row.name,
            url: row.url,
            min_gpa: row.min_gpa,
            distance: row.distance,
            dot_sim: row.similarity,
            score: row.score,
            rationale: row.rationale,
        }
    }
}

/// Timing metadata on the wire.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaBody {
    pub used_reranker: bool,
    pub total_ms: u64,
    pub embed_ms: u64,
    pub retrieve_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rerank_ms: Option<u64>,
}

impl From<MatchMeta> for MetaBody {
    fn from(meta: MatchMeta) -> Self {
        MetaBody {
            used_reranker: meta.used_reranker,
            total_ms: meta.total_ms,
            embed_ms: meta.embed_ms,
            retrieve_ms: meta.retrieve_ms,
            rerank_ms: meta.rerank_ms,
        }
    }
}

/// `POST /v1/match` success body.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResponseBody {
    pub ok: bool,
    pub rows: Vec<RowBody>,
    pub meta: MetaBody,
}

impl From<MatchSuccess> for MatchResponseBody {
    fn from(success: MatchSuccess) -> Self {
        MatchResponseBody {
            ok: true,
            rows: success.rows.into_iter().map(RowBody::from).collect(),
            meta: success.meta.into(),
        }
    }
}
