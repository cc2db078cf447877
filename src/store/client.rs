use qdrant_client::Qdrant;
use qdrant_client::qdrant::condition::ConditionOneOf;
use qdrant_client::qdrant::{Condition, Filter, Range, SearchPointsBuilder};
use std::time::Duration;
use tracing::debug;

use super::error::StoreError;
use super::model::{CandidateRow, EligibilityFilter};

/// Minimal async interface used by the match workflow.
pub trait CandidateStore: Send + Sync {
    /// Returns the `k` nearest scholarships for `vector`, closest first,
    /// restricted by the optional GPA and eligibility filters. Never yields
    /// more than `k` rows.
    fn top_k_by_embedding(
        &self,
        vector: Vec<f32>,
        k: usize,
        min_gpa: Option<f32>,
        eligibility: Option<&EligibilityFilter>,
    ) -> impl std::future::Future<Output = Result<Vec<CandidateRow>, StoreError>> + Send;
}

impl<T: CandidateStore> CandidateStore for std::sync::Arc<T> {
    async fn top_k_by_embedding(
        &self,
        vector: Vec<f32>,
        k: usize,
        min_gpa: Option<f32>,
        eligibility: Option<&EligibilityFilter>,
    ) -> Result<Vec<CandidateRow>, StoreError> {
        (**self).top_k_by_embedding(vector, k, min_gpa, eligibility).await
    }
}

/// Qdrant-backed scholarship store.
#[derive(Clone)]
pub struct ScholarshipStore {
    client: std::sync::Arc<Qdrant>,
    collection: String,
}

impl ScholarshipStore {
    /// Connects to `url` with a per-call `timeout`.
    pub fn connect(
        url: &str,
        collection: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let client = Qdrant::from_url(url)
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::ConnectionFailed {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client: std::sync::Arc::new(client),
            collection: collection.into(),
        })
    }

    /// Returns the configured collection name.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Performs a basic health check request.
    pub async fn health_check(&self) -> Result<(), StoreError> {
        self.client
            .health_check()
            .await
            .map_err(|e| StoreError::ConnectionFailed {
                url: String::new(),
                message: e.to_string(),
            })?;
        Ok(())
    }
}

impl CandidateStore for ScholarshipStore {
    async fn top_k_by_embedding(
        &self,
        vector: Vec<f32>,
        k: usize,
        min_gpa: Option<f32>,
        eligibility: Option<&EligibilityFilter>,
    ) -> Result<Vec<CandidateRow>, StoreError> {
        let mut builder =
            SearchPointsBuilder::new(&self.collection, vector, k as u64).with_payload(true);

        if let Some(filter) = build_candidate_filter(min_gpa, eligibility) {
            builder = builder.filter(filter);
        }

        let response = self
            .client
            .search_points(builder)
            .await
            .map_err(|e| StoreError::SearchFailed {
                collection: self.collection.clone(),
                message: e.to_string(),
            })?;

        let rows: Vec<CandidateRow> = response
            .result
            .into_iter()
            .filter_map(CandidateRow::from_scored_point)
            .take(k)
            .collect();

        debug!(
            collection = %self.collection,
            k = k,
            returned = rows.len(),
            "Candidate search complete"
        );

        Ok(rows)
    }
}

/// Builds the conjunctive payload filter for a candidate query.
///
/// GPA semantics: a scholarship passes when its own `min_gpa` requirement is at
/// most the student's GPA, or when it has no GPA requirement at all.
pub(crate) fn build_candidate_filter(
    min_gpa: Option<f32>,
    eligibility: Option<&EligibilityFilter>,
) -> Option<Filter> {
    let mut must: Vec<Condition> = Vec::new();

    if let Some(gpa) = min_gpa {
        must.push(any_of([
            Condition::range(
                "min_gpa",
                Range {
                    lte: Some(gpa as f64),
                    ..Default::default()
                },
            ),
            Condition::is_null("min_gpa"),
        ]));
    }

    if let Some(filter) = eligibility {
        if let Some(country) = &filter.country {
            must.push(Condition::matches("country", country.clone()));
        }
        if let Some(level) = &filter.level_of_study {
            must.push(Condition::matches("level_of_study", level.clone()));
        }
        if let Some(fields) = &filter.fields_of_study
            && !fields.is_empty()
        {
            must.push(Condition::matches("fields_of_study", fields.clone()));
        }
        if let Some(citizenship) = &filter.citizenship {
            must.push(Condition::matches("citizenship", citizenship.clone()));
        }
        if let Some(need) = filter.has_financial_need {
            must.push(Condition::matches("has_financial_need", need));
        }
        if let Some(gender) = &filter.gender {
            must.push(Condition::matches("gender", gender.clone()));
        }
    }

    if must.is_empty() {
        None
    } else {
        Some(Filter::must(must))
    }
}

/// Wraps a disjunction of conditions as a single nested condition.
fn any_of(conditions: impl IntoIterator<Item = Condition>) -> Condition {
    Condition {
        condition_one_of: Some(ConditionOneOf::Filter(Filter::should(conditions))),
    }
}
