use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::workflow::WorkflowError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("embedding failed: {0}")]
    EmbeddingFailed(String),

    #[error("retrieval failed: {0}")]
    RetrievalFailed(String),
}

impl From<WorkflowError> for GatewayError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::EmptySummary => {
                GatewayError::InvalidRequest("student_summary must be non-empty".to_string())
            }
            WorkflowError::Embed(message) => GatewayError::EmbeddingFailed(message),
            WorkflowError::Retrieve(message) => GatewayError::RetrievalFailed(message),
        }
    }
}

#[derive(serde::Serialize)]
pub struct ErrorBody {
    pub ok: bool,
    pub error: String,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = match &self {
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            // Upstream services failed us, not the caller.
            GatewayError::EmbeddingFailed(_) | GatewayError::RetrievalFailed(_) => {
                StatusCode::BAD_GATEWAY
            }
        };

        let body = Json(ErrorBody {
            ok: false,
            error: self.to_string(),
        });

        (status, body).into_response()
    }
}
