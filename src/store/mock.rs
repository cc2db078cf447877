use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::client::CandidateStore;
use super::error::StoreError;
use super::model::{CandidateRow, EligibilityFilter};

/// The filter arguments observed on the most recent query.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedQuery {
    pub k: usize,
    pub min_gpa: Option<f32>,
    pub eligibility: Option<EligibilityFilter>,
}

/// In-memory candidate store returning preloaded rows.
///
/// Records query arguments and call counts, and supports failure injection.
pub struct MockCandidateStore {
    rows: Mutex<Vec<CandidateRow>>,
    calls: AtomicUsize,
    fail_with: Mutex<Option<String>>,
    last_query: Mutex<Option<RecordedQuery>>,
}

impl MockCandidateStore {
    pub fn new(rows: Vec<CandidateRow>) -> Self {
        Self {
            rows: Mutex::new(rows),
            calls: AtomicUsize::new(0),
            fail_with: Mutex::new(None),
            last_query: Mutex::new(None),
        }
    }

    /// Builds a store preloaded with `n` generic rows in descending similarity.
    pub fn with_rows(n: usize) -> Self {
        let rows = (0..n).map(|i| Self::row(&format!("s{i}"), i)).collect();
        Self::new(rows)
    }

    /// Builds one generic row; `rank` positions it in the similarity order.
    pub fn row(id: &str, rank: usize) -> CandidateRow {
        let similarity = 0.95 - rank as f32 * 0.05;
        CandidateRow {
            id: id.to_string(),
            name: format!("Scholarship {id}"),
            url: Some(format!("https://example.org/{id}")),
            min_gpa: Some(3.0),
            snippet: Some(format!("Award for students, entry {id}")),
            distance: 1.0 - similarity,
            similarity,
            score: None,
            rationale: None,
        }
    }

    /// Makes every subsequent query fail with `message`.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.fail_with.lock() = Some(message.into());
    }

    /// Number of queries observed.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The arguments of the most recent query, if any.
    pub fn last_query(&self) -> Option<RecordedQuery> {
        self.last_query.lock().clone()
    }
}

impl CandidateStore for MockCandidateStore {
    async fn top_k_by_embedding(
        &self,
        _vector: Vec<f32>,
        k: usize,
        min_gpa: Option<f32>,
        eligibility: Option<&EligibilityFilter>,
    ) -> Result<Vec<CandidateRow>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock() = Some(RecordedQuery {
            k,
            min_gpa,
            eligibility: eligibility.cloned(),
        });

        if let Some(message) = self.fail_with.lock().clone() {
            return Err(StoreError::SearchFailed {
                collection: "mock".to_string(),
                message,
            });
        }

        let rows = self.rows.lock();
        Ok(rows.iter().take(k).cloned().collect())
    }
}
