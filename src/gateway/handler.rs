use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::embedding::Embedder;
use crate::rerank::Reranker;
use crate::store::CandidateStore;
use crate::workflow::MatchRequest;

use super::error::GatewayError;
use super::payload::{MatchRequestBody, MatchResponseBody};
use super::state::HandlerState;

#[instrument(skip(state, body), fields(request_id = %Uuid::new_v4()))]
pub async fn match_handler<E, C, R>(
    State(state): State<HandlerState<E, C, R>>,
    Json(body): Json<MatchRequestBody>,
) -> Result<Response, GatewayError>
where
    E: Embedder + 'static,
    C: CandidateStore + 'static,
    R: Reranker + 'static,
{
    debug!(
        summary_chars = body.student_summary.len(),
        k = ?body.k,
        "Match request received"
    );

    let request = MatchRequest::from(body);
    let success = state.workflow.run(request).await?;

    debug!(
        rows = success.rows.len(),
        used_reranker = success.meta.used_reranker,
        total_ms = success.meta.total_ms,
        "Match request complete"
    );

    Ok(Json(MatchResponseBody::from(success)).into_response())
}

#[derive(Debug, Deserialize)]
pub struct TelemetryParams {
    #[serde(default = "default_telemetry_limit")]
    pub limit: usize,
}

fn default_telemetry_limit() -> usize {
    50
}

/// Returns recent pipeline events, most recent first.
#[instrument(skip(state))]
pub async fn telemetry_handler<E, C, R>(
    State(state): State<HandlerState<E, C, R>>,
    Query(params): Query<TelemetryParams>,
) -> Response
where
    E: Embedder + 'static,
    C: CandidateStore + 'static,
    R: Reranker + 'static,
{
    let events = state.telemetry.recent(params.limit);
    Json(serde_json::json!({ "ok": true, "events": events })).into_response()
}
