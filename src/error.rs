//! Gateway error types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Gateway-level errors.
///
/// Every variant maps to a specific HTTP status via `IntoResponse`. Handlers
/// return `Result<_, GatewayError>`; nothing panics its way out of a request.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Route admission failed: a required header or query param was missing
    /// or didn't match the configured value.
    #[error("{0}")]
    Admission(String),

    /// Control-API request body was missing a required field.
    #[error("{0}")]
    InvalidRequest(String),

    /// Unknown target id on PUT/DELETE/`/test`.
    #[error("no target with id: {0}")]
    TargetNotFound(String),

    /// Unknown route path on PUT/DELETE/`/test`.
    #[error("no route registered at: {0}")]
    RouteNotFound(String),

    /// Anything else unexpected.
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = match &self {
            GatewayError::Admission(_) | GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::TargetNotFound(_) | GatewayError::RouteNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;
