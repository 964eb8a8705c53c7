//! HTTP mapping of tutor errors

use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mentor_kg::KgError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Graph(#[from] KgError),

    /// The write succeeded but the snapshot file could not be updated
    #[error("Failed to persist graph: {0}")]
    Persist(String),

    #[error("Invalid query string: {0}")]
    Query(#[from] QueryRejection),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Graph(KgError::ConceptNotFound(_) | KgError::NotFound { .. }) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Graph(KgError::InvalidBudget(_) | KgError::Validation(_)) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Graph(KgError::EdgeExists { .. } | KgError::ConceptExists(_)) => {
                StatusCode::CONFLICT
            }
            ApiError::Query(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
