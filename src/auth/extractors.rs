use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use uuid::Uuid;

use crate::auth::users::User;
use crate::error::ApiError;
use crate::state::AppState;

/// Pulls the session token out of an `Authorization: Bearer <token>` header.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<Uuid> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))?;
    Uuid::parse_str(token.trim()).ok()
}

/// Extracts the authenticated user behind the request's session token.
/// Rejects with `Unauthorized` when the token is missing, unknown, revoked,
/// expired, or when the referenced user no longer exists.
#[derive(Debug)]
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(ApiError::Unauthorized)?;
        let session = state
            .sessions
            .validate(token)
            .await
            .ok_or(ApiError::Unauthorized)?;
        let user = state
            .users
            .get(session.user_id)
            .ok_or(ApiError::Unauthorized)?;
        Ok(AuthUser(user))
    }
}

/// [`AuthUser`] plus the admin flag. A valid non-admin session rejects with
/// `Forbidden`, so callers can tell "log in first" from "not allowed".
#[derive(Debug)]
pub struct AdminUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin {
            return Err(ApiError::Forbidden);
        }
        Ok(AdminUser(user))
    }
}
