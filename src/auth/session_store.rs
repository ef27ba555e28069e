//! In-memory session store.
//!
//! Maps opaque session keys to authentication records. The key doubles as
//! the OAuth `state` anti-forgery value, so it must be unguessable.
//!
//! Records are never evicted: bindings live for the life of the process and
//! are lost on restart.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use dashmap::DashMap;
use rand::Rng;
use std::sync::Arc;

use crate::error::GatewayError;

/// Authentication record bound to one session key.
///
/// `access_token` starts absent and is populated exactly once by a
/// successful OAuth callback; it is never cleared or replaced.
#[derive(Debug, Clone, Default)]
pub struct SessionRecord {
    pub access_token: Option<String>,
}

/// Login progress for a session key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No record exists for the key.
    None,
    /// Login begun, no token bound yet.
    Pending,
    /// Token bound; terminal state.
    Authenticated,
}

/// Concurrency-safe session key -> record map.
///
/// Cloning is cheap and shares the underlying map, so the store can be
/// handed to the flow controller while tests keep a handle for inspection.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<DashMap<String, SessionRecord>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a fresh session key and insert a pending record for it.
    ///
    /// 16 random bytes, base64url without padding. Collisions are left to
    /// the entropy of the source rather than checked explicitly.
    pub fn create(&self) -> String {
        let mut rng = rand::thread_rng();
        let random_bytes: Vec<u8> = (0..16).map(|_| rng.gen()).collect();
        let key = URL_SAFE_NO_PAD.encode(&random_bytes);

        self.sessions.insert(key.clone(), SessionRecord::default());
        key
    }

    /// Pure lookup; clones the record out so no map guard escapes.
    pub fn get(&self, key: &str) -> Option<SessionRecord> {
        self.sessions.get(key).map(|record| record.value().clone())
    }

    /// Bind an access token to an existing record.
    ///
    /// Fails with `SessionNotFound` for unknown keys. First writer wins: a
    /// record that already carries a token keeps it, since an authenticated
    /// session never transitions back.
    pub fn set_token(&self, key: &str, token: String) -> Result<(), GatewayError> {
        let mut record = self
            .sessions
            .get_mut(key)
            .ok_or(GatewayError::SessionNotFound)?;

        if record.access_token.is_none() {
            record.access_token = Some(token);
        }
        Ok(())
    }

    /// Current state of a key, for guard checks and tests.
    pub fn state(&self, key: &str) -> SessionState {
        match self.get(key) {
            None => SessionState::None,
            Some(record) if record.access_token.is_some() => SessionState::Authenticated,
            Some(_) => SessionState::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_returns_distinct_unpadded_keys() {
        let store = SessionStore::new();
        let first = store.create();
        let second = store.create();

        assert_ne!(first, second);
        // 16 random bytes encode to 22 base64url characters without padding.
        assert_eq!(first.len(), 22);
        assert_eq!(second.len(), 22);
        assert!(!first.contains('='));
    }

    #[test]
    fn get_unknown_key_is_none() {
        let store = SessionStore::new();
        store.create();

        assert!(store.get("ghost").is_none());
        assert_eq!(store.state("ghost"), SessionState::None);
    }

    #[test]
    fn created_record_starts_pending_and_token_absent() {
        let store = SessionStore::new();
        let key = store.create();

        let record = store.get(&key).unwrap();
        assert!(record.access_token.is_none());
        assert_eq!(store.state(&key), SessionState::Pending);
    }

    #[test]
    fn set_token_is_visible_to_later_gets() {
        let store = SessionStore::new();
        let key = store.create();

        store.set_token(&key, "tok123".to_string()).unwrap();

        for _ in 0..3 {
            let record = store.get(&key).unwrap();
            assert_eq!(record.access_token.as_deref(), Some("tok123"));
        }
        assert_eq!(store.state(&key), SessionState::Authenticated);
    }

    #[test]
    fn set_token_on_unknown_key_fails_and_leaves_store_unchanged() {
        let store = SessionStore::new();
        let key = store.create();

        let result = store.set_token("ghost", "tok123".to_string());
        assert!(matches!(result, Err(GatewayError::SessionNotFound)));

        assert!(store.get("ghost").is_none());
        assert!(store.get(&key).unwrap().access_token.is_none());
    }

    #[test]
    fn first_bound_token_wins() {
        let store = SessionStore::new();
        let key = store.create();

        store.set_token(&key, "tok123".to_string()).unwrap();
        store.set_token(&key, "tok456".to_string()).unwrap();

        assert_eq!(
            store.get(&key).unwrap().access_token.as_deref(),
            Some("tok123")
        );
    }
}
