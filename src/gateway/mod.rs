//! HTTP gateway (Axum) for the match pipeline.
//!
//! This module is primarily used by the `scholarmatch` server binary.

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;


use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use handler::{match_handler, telemetry_handler};
pub use payload::{MatchRequestBody, MatchResponseBody, MetaBody, RowBody};
pub use state::HandlerState;

use crate::embedding::Embedder;
use crate::rerank::Reranker;
use crate::store::CandidateStore;

pub fn create_router_with_state<E, C, R>(state: HandlerState<E, C, R>) -> Router
where
    E: Embedder + 'static,
    C: CandidateStore + 'static,
    R: Reranker + 'static,
{
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/v1/match", post(match_handler))
        .route("/v1/telemetry", get(telemetry_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    (StatusCode::OK, Json(HealthResponse { status: "ok" })).into_response()
}
