use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, PublicUser, RegisterRequest},
        extractors::{bearer_token, AuthUser},
        password::hash_password,
        services::authenticate,
    },
    error::ApiError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/user", get(current_user))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let username = payload.username.trim();
    if username.is_empty() {
        warn!("registration with empty username");
        return Err(ApiError::Validation("Username is required".into()));
    }
    if payload.password.len() < 8 {
        warn!(%username, "registration password too short");
        return Err(ApiError::Validation("Password too short".into()));
    }

    let hash = hash_password(&payload.password)?;
    let user = state.users.create(username, &hash)?;
    let session = state.sessions.create(user.id).await;

    info!(user_id = user.id, %username, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token: session.token,
            user: user.into(),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let (session, user) = authenticate(
        &state.users,
        state.sessions.as_ref(),
        &payload.username,
        &payload.password,
    )
    .await?;

    info!(user_id = user.id, username = %user.username, "user logged in");
    Ok(Json(AuthResponse {
        token: session.token,
        user: user.into(),
    }))
}

/// Revokes the presented session. Idempotent: a missing, unknown or
/// already-revoked token still gets a 200.
#[instrument(skip(state, headers))]
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> StatusCode {
    if let Some(token) = bearer_token(&headers) {
        state.sessions.revoke(token).await;
        info!("session revoked");
    }
    StatusCode::OK
}

#[instrument(skip_all)]
pub async fn current_user(AuthUser(user): AuthUser) -> Json<PublicUser> {
    Json(user.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn register_then_login_roundtrip() {
        let state = AppState::fake();
        let (status, Json(registered)) = register(
            State(state.clone()),
            Json(RegisterRequest {
                username: "alice".into(),
                password: "long-enough-password".into(),
            }),
        )
        .await
        .expect("register");
        assert_eq!(status, StatusCode::CREATED);
        assert!(!registered.user.is_admin);

        let Json(logged_in) = login(
            State(state),
            Json(LoginRequest {
                username: "alice".into(),
                password: "long-enough-password".into(),
            }),
        )
        .await
        .expect("login");
        assert_eq!(logged_in.user.id, registered.user.id);
        assert_ne!(logged_in.token, registered.token);
    }

    #[tokio::test]
    async fn register_rejects_short_password_and_empty_username() {
        let state = AppState::fake();
        let err = register(
            State(state.clone()),
            Json(RegisterRequest {
                username: "alice".into(),
                password: "short".into(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        let err = register(
            State(state),
            Json(RegisterRequest {
                username: "   ".into(),
                password: "long-enough-password".into(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn register_conflicts_on_duplicate_username() {
        let state = AppState::fake();
        let body = || RegisterRequest {
            username: "alice".into(),
            password: "long-enough-password".into(),
        };
        register(State(state.clone()), Json(body()))
            .await
            .expect("first register");
        let err = register(State(state), Json(body())).await.unwrap_err();
        assert!(matches!(err, ApiError::DuplicateUsername));
    }

    #[tokio::test]
    async fn logout_revokes_the_session_and_is_idempotent() {
        let state = AppState::fake();
        let (_, Json(auth)) = register(
            State(state.clone()),
            Json(RegisterRequest {
                username: "alice".into(),
                password: "long-enough-password".into(),
            }),
        )
        .await
        .expect("register");

        let mut headers = HeaderMap::new();
        headers.insert(
            "authorization",
            format!("Bearer {}", auth.token).parse().unwrap(),
        );

        assert_eq!(
            logout(State(state.clone()), headers.clone()).await,
            StatusCode::OK
        );
        assert!(state.sessions.validate(auth.token).await.is_none());
        // Logging out again, or with no token at all, is still a 200.
        assert_eq!(logout(State(state.clone()), headers).await, StatusCode::OK);
        assert_eq!(
            logout(State(state), HeaderMap::new()).await,
            StatusCode::OK
        );
    }
}
