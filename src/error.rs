use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// The API error taxonomy. Every failure surfaced to a client collapses into
/// one of these variants; the HTTP status mapping lives in a single
/// `IntoResponse` impl so the seven error classes stay distinguishable.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Semantic input validation failure (400).
    #[error("{0}")]
    Validation(String),

    /// Authentication failure on login. Both an unknown user and a wrong
    /// password collapse here with a fixed, generic message (401).
    #[error("Invalid username or password")]
    AuthFailed,

    /// Missing or invalid session on a protected route (401).
    #[error("Unauthorized")]
    Unauthorized,

    /// Valid session but insufficient privileges (403).
    #[error("Forbidden")]
    Forbidden,

    /// Unknown resource; carries the singular noun of the resource kind (404).
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Username already taken (409).
    #[error("Username already taken")]
    DuplicateUsername,

    /// Catch-all internal failure. The full error is logged; the client sees
    /// a generic body (500).
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::AuthFailed => (StatusCode::UNAUTHORIZED, self.to_string()),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, self.to_string()),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::DuplicateUsername => (StatusCode::CONFLICT, self.to_string()),
            ApiError::Internal(err) => {
                tracing::error!(error = %err, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
