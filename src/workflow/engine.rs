use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::cache::{TtlCache, rerank_cache_key};
use crate::embedding::Embedder;
use crate::rerank::{CandidateBrief, RankedEntry, Reranker};
use crate::store::{CandidateRow, CandidateStore};
use crate::telemetry::{PipelineStep, TelemetryEvent, TelemetrySink};

use super::error::WorkflowError;
use super::model::{MIN_RERANK_CANDIDATES, MatchMeta, MatchRequest, MatchSuccess, clamp_k};

/// Tuning knobs for the workflow's rerank caching.
#[derive(Debug, Clone)]
pub struct WorkflowOptions {
    /// TTL for cached rerank results.
    pub rerank_cache_ttl: Duration,
}

impl Default for WorkflowOptions {
    fn default() -> Self {
        Self {
            rerank_cache_ttl: Duration::from_secs(86_400),
        }
    }
}

/// Cache of reranked row sets, keyed by [`rerank_cache_key`].
///
/// Constructed by the caller and handed to [`MatchWorkflow::new`], so several
/// workflows can share one instance and tests get a fresh one each.
pub type RerankCache = TtlCache<Arc<Vec<CandidateRow>>>;

/// The match pipeline coordinator.
///
/// Stages run strictly in order (embed, retrieve, optional rerank) since each
/// stage's output is the next stage's input. Embedding and retrieval failures
/// are fatal to the request; rerank failures degrade to the vector order.
/// The cache and telemetry sink are shared across in-flight requests.
pub struct MatchWorkflow<E, C, R> {
    embedder: E,
    store: C,
    reranker: R,
    cache: Arc<RerankCache>,
    rerank_ttl: Duration,
    telemetry: Arc<TelemetrySink>,
}

impl<E, C, R> MatchWorkflow<E, C, R>
where
    E: Embedder,
    C: CandidateStore,
    R: Reranker,
{
    pub fn new(
        embedder: E,
        store: C,
        reranker: R,
        cache: Arc<RerankCache>,
        telemetry: Arc<TelemetrySink>,
        options: WorkflowOptions,
    ) -> Self {
        Self {
            embedder,
            store,
            reranker,
            cache,
            rerank_ttl: options.rerank_cache_ttl,
            telemetry,
        }
    }

    /// Runs the full match pipeline for one request.
    ///
    /// Never panics: every internal fault becomes either a typed fatal error
    /// or a degraded-but-successful response.
    pub async fn run(&self, request: MatchRequest) -> Result<MatchSuccess, WorkflowError> {
        let started = Instant::now();

        let summary = request.student_summary.trim().to_string();
        if summary.is_empty() {
            let err = WorkflowError::EmptySummary;
            self.finish(started, false, Some(&err));
            return Err(err);
        }

        let k = clamp_k(request.k);
        debug!(k = k, use_reranker = request.use_reranker, "Match started");

        // Embed. Fatal on failure: nothing downstream works without a vector.
        let embed_started = Instant::now();
        let vector = match self.embedder.embed(std::slice::from_ref(&summary)).await {
            Ok(mut vectors) if !vectors.is_empty() => {
                let vector = vectors.swap_remove(0);
                self.telemetry.record(
                    TelemetryEvent::success(PipelineStep::Embed, embed_started.elapsed(), None)
                        .with_meta(serde_json::json!({ "chars": summary.len() })),
                );
                vector
            }
            Ok(_) => {
                return Err(self.fatal_embed(started, embed_started, "embedder returned no vectors"));
            }
            Err(e) => {
                return Err(self.fatal_embed(started, embed_started, e.to_string()));
            }
        };
        let embed_ms = ms(embed_started.elapsed());

        // Retrieve. Likewise fatal.
        let retrieve_started = Instant::now();
        let rows = match self
            .store
            .top_k_by_embedding(vector, k, request.min_gpa, request.eligibility.as_ref())
            .await
        {
            Ok(rows) => {
                self.telemetry.record(
                    TelemetryEvent::success(
                        PipelineStep::Retrieve,
                        retrieve_started.elapsed(),
                        None,
                    )
                    .with_meta(serde_json::json!({ "k": k, "returned": rows.len() })),
                );
                rows
            }
            Err(e) => {
                self.telemetry.record(TelemetryEvent::failure(
                    PipelineStep::Retrieve,
                    retrieve_started.elapsed(),
                    e.to_string(),
                ));
                let err = WorkflowError::Retrieve(e.to_string());
                self.finish(started, false, Some(&err));
                return Err(err);
            }
        };
        let retrieve_ms = ms(retrieve_started.elapsed());

        // Tiny result sets are returned as-is; reranking would add latency
        // without meaningfully improving the ordering.
        if rows.len() < MIN_RERANK_CANDIDATES || !request.use_reranker {
            self.finish(started, true, None);
            return Ok(MatchSuccess {
                rows,
                meta: MatchMeta {
                    used_reranker: false,
                    total_ms: ms(started.elapsed()),
                    embed_ms,
                    retrieve_ms,
                    rerank_ms: None,
                },
            });
        }

        // Rerank, best-effort: cache hit, fresh call, or silent fallback.
        let cache_key = rerank_cache_key(&summary, request.min_gpa, k);

        if let Some(cached) = self.cache.get(&cache_key) {
            debug!("Rerank cache hit");
            self.telemetry.record(
                TelemetryEvent::success(PipelineStep::Rerank, Duration::ZERO, None)
                    .with_meta(serde_json::json!({ "cache_hit": true })),
            );
            self.finish(started, true, None);
            return Ok(MatchSuccess {
                rows: cached.as_ref().clone(),
                meta: MatchMeta {
                    used_reranker: true,
                    total_ms: ms(started.elapsed()),
                    embed_ms,
                    retrieve_ms,
                    rerank_ms: Some(0),
                },
            });
        }

        let briefs: Vec<CandidateBrief> = rows.iter().map(CandidateBrief::from_row).collect();
        let rerank_started = Instant::now();

        match self.reranker.rerank(&summary, &briefs).await {
            Ok(entries) => {
                let merged = merge_ranking(rows, entries);
                self.cache
                    .insert(cache_key, Arc::new(merged.clone()), self.rerank_ttl);
                self.telemetry.record(
                    TelemetryEvent::success(PipelineStep::Rerank, rerank_started.elapsed(), None)
                        .with_meta(serde_json::json!({
                            "candidates": briefs.len(),
                            "cache_hit": false,
                        })),
                );
                self.finish(started, true, None);
                Ok(MatchSuccess {
                    rows: merged,
                    meta: MatchMeta {
                        used_reranker: true,
                        total_ms: ms(started.elapsed()),
                        embed_ms,
                        retrieve_ms,
                        rerank_ms: Some(ms(rerank_started.elapsed())),
                    },
                })
            }
            Err(e) => {
                // Reranking is an enhancement, not a dependency: fall back to
                // the vector-ranked order without surfacing the failure.
                warn!(error = %e, "Reranker failed, returning vector order");
                self.telemetry.record(TelemetryEvent::failure(
                    PipelineStep::Rerank,
                    rerank_started.elapsed(),
                    e.to_string(),
                ));
                self.finish(started, true, None);
                Ok(MatchSuccess {
                    rows,
                    meta: MatchMeta {
                        used_reranker: false,
                        total_ms: ms(started.elapsed()),
                        embed_ms,
                        retrieve_ms,
                        rerank_ms: None,
                    },
                })
            }
        }
    }

    /// Returns the telemetry sink shared with this workflow.
    pub fn telemetry(&self) -> &Arc<TelemetrySink> {
        &self.telemetry
    }

    fn fatal_embed(
        &self,
        started: Instant,
        embed_started: Instant,
        message: impl Into<String>,
    ) -> WorkflowError {
        let message = message.into();
        self.telemetry.record(TelemetryEvent::failure(
            PipelineStep::Embed,
            embed_started.elapsed(),
            message.clone(),
        ));
        let err = WorkflowError::Embed(message);
        self.finish(started, false, Some(&err));
        err
    }

    fn finish(&self, started: Instant, ok: bool, error: Option<&WorkflowError>) {
        let event = match error {
            Some(e) => {
                TelemetryEvent::failure(PipelineStep::Pipeline, started.elapsed(), e.to_string())
            }
            None => TelemetryEvent::success(PipelineStep::Pipeline, started.elapsed(), None),
        };
        debug_assert_eq!(ok, error.is_none());
        self.telemetry.record(event);
    }
}

/// Reassembles rows in the reranker's order, attaching score and rationale.
///
/// Ranked ids with no matching row are dropped. The validated contract makes
/// that impossible for the production client, but the merge stays defensive.
fn merge_ranking(rows: Vec<CandidateRow>, entries: Vec<RankedEntry>) -> Vec<CandidateRow> {
    let mut by_id: HashMap<String, CandidateRow> =
        rows.into_iter().map(|r| (r.id.clone(), r)).collect();

    let mut merged = Vec::with_capacity(entries.len());
    for entry in entries {
        if let Some(mut row) = by_id.remove(&entry.id) {
            row.score = Some(entry.score);
            row.rationale = Some(entry.rationale);
            merged.push(row);
        }
    }
    merged
}

#[inline]
fn ms(duration: Duration) -> u64 {
    duration.as_millis() as u64
}
