use axum::{extract::State, routing::post, Json, Router};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, instrument};

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn router() -> Router<AppState> {
    Router::new().route("/contact", post(send_contact))
}

/// Validates the form shape, then hands the message to the mail
/// collaborator. A delivery failure is a 500, never a validation error.
#[instrument(skip(state, payload))]
pub async fn send_contact(
    State(state): State<AppState>,
    Json(payload): Json<ContactRequest>,
) -> Result<Json<Value>, ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::Validation("Name is required".into()));
    }
    if !is_valid_email(&payload.email) {
        return Err(ApiError::Validation("Invalid email address".into()));
    }
    if payload.message.trim().is_empty() {
        return Err(ApiError::Validation("Message is required".into()));
    }

    if let Err(e) = state
        .mailer
        .send_contact(&payload.name, &payload.email, &payload.message)
        .await
    {
        error!(error = %e, "contact email delivery failed");
        return Err(ApiError::Internal(e));
    }

    Ok(Json(json!({ "message": "Message sent successfully" })))
}
