use qdrant_client::qdrant::ScoredPoint;
use qdrant_client::qdrant::point_id::PointIdOptions;
use serde::{Deserialize, Serialize};

/// Structured eligibility predicates applied conjunctively at retrieval time.
///
/// A predicate is skipped (not applied) when its field is `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EligibilityFilter {
    pub country: Option<String>,
    pub level_of_study: Option<String>,
    pub fields_of_study: Option<Vec<String>>,
    pub citizenship: Option<String>,
    pub has_financial_need: Option<bool>,
    pub gender: Option<String>,
}

impl EligibilityFilter {
    /// Returns `true` when no predicate is set.
    pub fn is_empty(&self) -> bool {
        self.country.is_none()
            && self.level_of_study.is_none()
            && self
                .fields_of_study
                .as_ref()
                .is_none_or(|f| f.is_empty())
            && self.citizenship.is_none()
            && self.has_financial_need.is_none()
            && self.gender.is_none()
    }
}

/// One retrieved scholarship candidate.
///
/// Created fresh per request from the store response. `score` and `rationale`
/// are only present after a successful rerank, in which case `score` supersedes
/// `similarity` for ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRow {
    pub id: String,
    pub name: String,
    pub url: Option<String>,
    pub min_gpa: Option<f32>,
    /// Short description used for the rerank projection; not part of the wire row.
    pub snippet: Option<String>,
    /// Raw similarity-space distance, lower is closer.
    pub distance: f32,
    /// Normalized similarity used as the rerank-free ranking signal.
    pub similarity: f32,
    pub score: Option<f32>,
    pub rationale: Option<String>,
}

impl CandidateRow {
    /// Maps a Qdrant scored point into a row.
    ///
    /// Points without an id or a `name` payload field are dropped.
    pub fn from_scored_point(point: ScoredPoint) -> Option<Self> {
        let id = match point.id.and_then(|pid| pid.point_id_options) {
            Some(PointIdOptions::Num(n)) => n.to_string(),
            Some(PointIdOptions::Uuid(u)) => u,
            None => return None,
        };

        let payload = point.payload;

        let name = payload
            .get("name")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())?;

        let url = payload
            .get("url")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());

        let min_gpa = payload.get("min_gpa").and_then(value_as_f32);

        let snippet = payload
            .get("snippet")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());

        let similarity = point.score;

        Some(CandidateRow {
            id,
            name,
            url,
            min_gpa,
            snippet,
            distance: 1.0 - similarity,
            similarity,
            score: None,
            rationale: None,
        })
    }
}

fn value_as_f32(value: &qdrant_client::qdrant::Value) -> Option<f32> {
    value
        .as_double()
        .map(|d| d as f32)
        .or_else(|| value.as_integer().map(|i| i as f32))
}
