use std::collections::HashMap;

use parking_lot::RwLock;
use serde::Serialize;

use crate::error::ApiError;

/// Credential record. The hash never appears in a response body.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_admin: bool,
}

struct Inner {
    by_id: HashMap<i32, User>,
    next_id: i32,
}

/// In-memory credential store. Owns every `User` for the lifetime of the
/// process; usernames are unique with exact, case-sensitive matching.
pub struct UserStore {
    inner: RwLock<Inner>,
}

impl UserStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                by_id: HashMap::new(),
                next_id: 1,
            }),
        }
    }

    pub fn get(&self, id: i32) -> Option<User> {
        self.inner.read().by_id.get(&id).cloned()
    }

    pub fn get_by_username(&self, username: &str) -> Option<User> {
        self.inner
            .read()
            .by_id
            .values()
            .find(|u| u.username == username)
            .cloned()
    }

    /// Registers a regular account. Callers hash the password first; the
    /// store never sees plaintext.
    pub fn create(&self, username: &str, password_hash: &str) -> Result<User, ApiError> {
        self.insert(username, password_hash, false)
    }

    /// Startup-only path for the seeded admin account. Nothing routed over
    /// HTTP reaches this.
    pub fn create_admin(&self, username: &str, password_hash: &str) -> Result<User, ApiError> {
        self.insert(username, password_hash, true)
    }

    fn insert(&self, username: &str, password_hash: &str, is_admin: bool) -> Result<User, ApiError> {
        let mut inner = self.inner.write();
        if inner.by_id.values().any(|u| u.username == username) {
            return Err(ApiError::DuplicateUsername);
        }
        let id = inner.next_id;
        inner.next_id += 1;
        let user = User {
            id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            is_admin,
        };
        inner.by_id.insert(id, user.clone());
        Ok(user)
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_then_lookup_by_id_and_username() {
        let store = UserStore::new();
        let created = store.create("alice", "hash-a").expect("create");
        assert_eq!(created.id, 1);
        assert!(!created.is_admin);

        let by_id = store.get(created.id).expect("get by id");
        assert_eq!(by_id.username, "alice");
        let by_name = store.get_by_username("alice").expect("get by username");
        assert_eq!(by_name.id, created.id);
    }

    #[test]
    fn duplicate_username_is_rejected() {
        let store = UserStore::new();
        store.create("alice", "hash-a").expect("first create");
        let err = store.create("alice", "hash-b").unwrap_err();
        assert!(matches!(err, ApiError::DuplicateUsername));
    }

    #[test]
    fn username_match_is_case_sensitive() {
        let store = UserStore::new();
        store.create("Admin", "hash").expect("create");
        assert!(store.get_by_username("admin").is_none());
        assert!(store.get_by_username("Admin").is_some());
    }

    #[test]
    fn ids_are_monotonic() {
        let store = UserStore::new();
        let a = store.create("a", "h").expect("a");
        let b = store.create("b", "h").expect("b");
        let c = store.create("c", "h").expect("c");
        assert_eq!((a.id, b.id, c.id), (1, 2, 3));
    }

    #[test]
    fn password_hash_is_not_serialized() {
        let store = UserStore::new();
        let user = store.create("alice", "super-secret-hash").expect("create");
        let json = serde_json::to_string(&user).expect("serialize");
        assert!(!json.contains("super-secret-hash"));
        assert!(json.contains("alice"));
    }
}
