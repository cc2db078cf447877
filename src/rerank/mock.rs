use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::client::Reranker;
use super::error::RerankError;
use super::model::{CandidateBrief, RankedEntry};

type RerankScript =
    Box<dyn Fn(&[CandidateBrief]) -> Result<Vec<RankedEntry>, RerankError> + Send + Sync>;

/// Scriptable reranker for workflow tests.
///
/// By default returns the candidates in input order with descending scores.
/// Use [`MockReranker::with_script`] to override the behavior, including
/// returning errors or contract-violating rankings.
pub struct MockReranker {
    calls: AtomicUsize,
    script: Mutex<Option<RerankScript>>,
}

impl MockReranker {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            script: Mutex::new(None),
        }
    }

    /// Builds a reranker driven by `script`.
    pub fn with_script(
        script: impl Fn(&[CandidateBrief]) -> Result<Vec<RankedEntry>, RerankError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        let mock = Self::new();
        *mock.script.lock() = Some(Box::new(script));
        mock
    }

    /// Builds a reranker that always fails with a provider error.
    pub fn failing(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::with_script(move |_| {
            Err(RerankError::Provider {
                message: message.clone(),
            })
        })
    }

    /// Builds a reranker that reverses the candidate order with distinct scores.
    pub fn reversing() -> Self {
        Self::with_script(|candidates| {
            Ok(candidates
                .iter()
                .rev()
                .enumerate()
                .map(|(i, c)| RankedEntry {
                    id: c.id.clone(),
                    score: 95.0 - i as f32,
                    rationale: format!("Strong match for {}", c.name),
                })
                .collect())
        })
    }

    /// Number of `rerank` calls observed.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockReranker {
    fn default() -> Self {
        Self::new()
    }
}

impl Reranker for MockReranker {
    async fn rerank(
        &self,
        _summary: &str,
        candidates: &[CandidateBrief],
    ) -> Result<Vec<RankedEntry>, RerankError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(script) = self.script.lock().as_ref() {
            return script(candidates);
        }

        Ok(candidates
            .iter()
            .enumerate()
            .map(|(i, c)| RankedEntry {
                id: c.id.clone(),
                score: (90 - i as i32).max(0) as f32,
                rationale: "Relevant to the stated profile".to_string(),
            })
            .collect())
    }
}
