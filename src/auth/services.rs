use lazy_static::lazy_static;
use tracing::warn;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::session::{Session, SessionStore};
use crate::auth::users::{User, UserStore};
use crate::error::ApiError;

lazy_static! {
    /// Verified against on unknown-username logins so that both failure
    /// paths pay the same argon2 cost.
    static ref DUMMY_HASH: String =
        hash_password("folio-dummy-credential").expect("hash dummy credential");
}

/// Checks credentials and opens a session. Unknown username and wrong
/// password collapse into the same `AuthFailed`; the caller cannot tell
/// which factor was wrong, by message or by timing.
pub async fn authenticate(
    users: &UserStore,
    sessions: &dyn SessionStore,
    username: &str,
    password: &str,
) -> Result<(Session, User), ApiError> {
    let user = users.get_by_username(username);

    let hash = user
        .as_ref()
        .map_or(DUMMY_HASH.as_str(), |u| u.password_hash.as_str());
    let ok = verify_password(password, hash).unwrap_or(false);

    match user {
        Some(user) if ok => {
            let session = sessions.create(user.id).await;
            Ok((session, user))
        }
        _ => {
            warn!(%username, "login failed");
            Err(ApiError::AuthFailed)
        }
    }
}
