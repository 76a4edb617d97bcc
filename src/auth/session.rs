use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

/// Server-held session binding an opaque token to a user id.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: Uuid,
    pub user_id: i32,
    pub created_at: OffsetDateTime,
    pub last_seen_at: OffsetDateTime,
}

/// Pluggable session backing. A durable or shared store can be swapped in
/// without touching the extractors that sit on top of it.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create(&self, user_id: i32) -> Session;
    /// Returns the session and refreshes its idle clock. `None` for unknown,
    /// revoked or idle-expired tokens; expired entries are dropped here
    /// rather than by an eager background task.
    async fn validate(&self, token: Uuid) -> Option<Session>;
    /// Idempotent; revoking an unknown or already-revoked token is a no-op.
    async fn revoke(&self, token: Uuid);
    /// Drops every idle-expired session. Validation already expires lazily,
    /// so the sweep only bounds memory held by abandoned sessions.
    async fn sweep_expired(&self);
}

pub struct MemorySessionStore {
    ttl: Duration,
    sessions: Mutex<HashMap<Uuid, Session>>,
}

impl MemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, user_id: i32) -> Session {
        let now = OffsetDateTime::now_utc();
        let session = Session {
            token: Uuid::new_v4(),
            user_id,
            created_at: now,
            last_seen_at: now,
        };
        self.sessions.lock().insert(session.token, session.clone());
        session
    }

    async fn validate(&self, token: Uuid) -> Option<Session> {
        let now = OffsetDateTime::now_utc();
        let mut sessions = self.sessions.lock();
        match sessions.get_mut(&token) {
            Some(session) if now - session.last_seen_at <= self.ttl => {
                session.last_seen_at = now;
                Some(session.clone())
            }
            Some(_) => {
                sessions.remove(&token);
                None
            }
            None => None,
        }
    }

    async fn revoke(&self, token: Uuid) {
        self.sessions.lock().remove(&token);
    }

    async fn sweep_expired(&self) {
        let now = OffsetDateTime::now_utc();
        let ttl = self.ttl;
        self.sessions.lock().retain(|_, s| now - s.last_seen_at <= ttl);
    }
}

#[cfg(test)]
impl MemorySessionStore {
    pub(crate) fn len(&self) -> usize {
        self.sessions.lock().len()
    }
}
