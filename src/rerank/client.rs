use genai::chat::{ChatMessage, ChatRequest};
use std::collections::HashSet;
use std::time::Duration;
use tracing::debug;

use super::error::RerankError;
use super::model::{CandidateBrief, RankedEntry};

/// Inclusive score range the reranker must honor.
pub const SCORE_RANGE: std::ops::RangeInclusive<f32> = 0.0..=100.0;

const SYSTEM_PROMPT: &str = "You are a scholarship relevance judge. You rank scholarship \
candidates for a student and reply with strict JSON only, no prose.";

/// Minimal async interface used by the match workflow.
pub trait Reranker: Send + Sync {
    /// Returns a total ordering over `candidates` (most relevant first),
    /// with exactly one entry per candidate id.
    fn rerank(
        &self,
        summary: &str,
        candidates: &[CandidateBrief],
    ) -> impl std::future::Future<Output = Result<Vec<RankedEntry>, RerankError>> + Send;
}

impl<T: Reranker> Reranker for std::sync::Arc<T> {
    async fn rerank(
        &self,
        summary: &str,
        candidates: &[CandidateBrief],
    ) -> Result<Vec<RankedEntry>, RerankError> {
        (**self).rerank(summary, candidates).await
    }
}

/// LLM-backed reranker driving a `genai` chat client.
pub struct LlmReranker {
    client: genai::Client,
    model: String,
    timeout: Duration,
}

impl LlmReranker {
    /// Creates a reranker for `model` with a per-call `timeout`.
    pub fn new(model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: genai::Client::default(),
            model: model.into(),
            timeout,
        }
    }

    /// Returns the configured model identifier.
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl Reranker for LlmReranker {
    async fn rerank(
        &self,
        summary: &str,
        candidates: &[CandidateBrief],
    ) -> Result<Vec<RankedEntry>, RerankError> {
        debug!(
            candidates = candidates.len(),
            model = %self.model,
            "Requesting rerank"
        );

        let prompt = build_rerank_prompt(summary, candidates);
        let request = ChatRequest::new(vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(prompt),
        ]);

        let response = tokio::time::timeout(
            self.timeout,
            self.client.exec_chat(&self.model, request, None),
        )
        .await
        .map_err(|_| RerankError::Timeout {
            timeout: self.timeout,
        })?
        .map_err(|e| RerankError::Provider {
            message: e.to_string(),
        })?;

        let text = response.first_text().ok_or(RerankError::EmptyCompletion)?;

        let entries = parse_ranking(text)?;
        validate_ranking(candidates, &entries)?;

        debug!(
            top_score = entries.first().map(|e| e.score),
            "Rerank complete"
        );

        Ok(entries)
    }
}

/// Builds the user prompt: the student summary plus a JSON candidate list and
/// the exact output shape the model must return.
pub(crate) fn build_rerank_prompt(summary: &str, candidates: &[CandidateBrief]) -> String {
    let candidates_json =
        serde_json::to_string_pretty(candidates).unwrap_or_else(|_| "[]".to_string());

    format!(
        "Student profile:\n{summary}\n\n\
         Scholarship candidates:\n{candidates_json}\n\n\
         Rank ALL candidates from most to least relevant for this student. \
         Reply with a JSON array only, one object per candidate, in ranked order:\n\
         [{{\"id\": \"<candidate id>\", \"score\": <0-100>, \"rationale\": \"<1-2 sentences>\"}}]\n\
         Include every candidate id exactly once. Do not invent ids."
    )
}

/// Parses a completion into ranking entries, tolerating a fenced code block.
pub(crate) fn parse_ranking(text: &str) -> Result<Vec<RankedEntry>, RerankError> {
    let body = strip_code_fence(text);
    serde_json::from_str(body).map_err(|e| RerankError::Malformed {
        message: e.to_string(),
    })
}

/// Checks the ranking against the contract: exactly one entry per input id,
/// no duplicates or unknown ids, every score within [`SCORE_RANGE`].
pub(crate) fn validate_ranking(
    candidates: &[CandidateBrief],
    entries: &[RankedEntry],
) -> Result<(), RerankError> {
    if entries.len() != candidates.len() {
        return Err(RerankError::Contract {
            message: format!(
                "expected {} entries, got {}",
                candidates.len(),
                entries.len()
            ),
        });
    }

    let known: HashSet<&str> = candidates.iter().map(|c| c.id.as_str()).collect();
    let mut seen: HashSet<&str> = HashSet::with_capacity(entries.len());

    for entry in entries {
        if !known.contains(entry.id.as_str()) {
            return Err(RerankError::Contract {
                message: format!("unknown candidate id '{}'", entry.id),
            });
        }
        if !seen.insert(entry.id.as_str()) {
            return Err(RerankError::Contract {
                message: format!("duplicate candidate id '{}'", entry.id),
            });
        }
        if !entry.score.is_finite() || !SCORE_RANGE.contains(&entry.score) {
            return Err(RerankError::Contract {
                message: format!("score {} for id '{}' outside [0, 100]", entry.score, entry.id),
            });
        }
    }

    // len equality plus uniqueness implies full coverage.
    Ok(())
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop an optional language tag after the opening fence.
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.trim_start_matches(['\r', '\n']);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
