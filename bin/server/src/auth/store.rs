//! In-memory session storage.

use chrono::Duration;
use google0auth_core::SessionId;
use google0auth_platform_access::{Authentication, AuthenticationError, Session};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Sessions keyed by ID, shared by every request handler.
///
/// Cloning is cheap; clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, Session>>>,
}

impl SessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a new session, replacing any session with the same ID.
    pub async fn create(&self, session: Session) {
        self.sessions.write().await.insert(session.id(), session);
    }

    /// Finds a session by ID, expired or not.
    pub async fn find_by_id(&self, id: &SessionId) -> Option<Session> {
        self.sessions.read().await.get(id).cloned()
    }

    /// Resolves a session cookie value into an authentication.
    ///
    /// Live sessions have their idle expiry pushed out by `idle_timeout`.
    /// Expired sessions are removed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSession` for malformed or unknown IDs and
    /// `SessionExpired` for sessions past their expiry.
    pub async fn resolve(
        &self,
        cookie_value: &str,
        idle_timeout: Duration,
    ) -> Result<Authentication, AuthenticationError> {
        let invalid = || AuthenticationError::InvalidSession {
            session_id: cookie_value.to_string(),
        };
        let session_id: SessionId = cookie_value.parse().map_err(|_| invalid())?;

        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&session_id).ok_or_else(invalid)?;

        if session.is_expired() {
            sessions.remove(&session_id);
            return Err(AuthenticationError::SessionExpired { session_id });
        }

        session.touch(idle_timeout);
        Ok(Authentication::new(session.clone()))
    }

    /// Deletes a session. Returns true if it existed.
    pub async fn delete(&self, id: &SessionId) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    /// Removes every expired session and returns how many were removed.
    pub async fn delete_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.is_valid());
        before - sessions.len()
    }

    /// Returns the number of stored sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Returns true if no sessions are stored.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use google0auth_platform_access::Principal;

    fn session(duration: Duration) -> Session {
        let principal = Principal::new(
            "sub_123".to_string(),
            "https://accounts.google.com".to_string(),
        );
        Session::new(SessionId::new(), principal, duration)
    }

    #[tokio::test]
    async fn resolves_live_session() {
        let store = SessionStore::new();
        let session = session(Duration::minutes(30));
        let id = session.id();
        store.create(session).await;

        let auth = store
            .resolve(&id.to_string(), Duration::minutes(30))
            .await
            .expect("authenticated");

        assert_eq!(auth.session_id(), id);
        assert_eq!(auth.principal().subject(), "sub_123");
    }

    #[tokio::test]
    async fn resolve_extends_idle_expiry() {
        let store = SessionStore::new();
        let session = session(Duration::seconds(5));
        let id = session.id();
        let original_expiry = session.expires_at();
        store.create(session).await;

        store
            .resolve(&id.to_string(), Duration::minutes(30))
            .await
            .expect("authenticated");

        let stored = store.find_by_id(&id).await.expect("stored");
        assert!(stored.expires_at() > original_expiry);
    }

    #[tokio::test]
    async fn expired_session_is_rejected_and_removed() {
        let store = SessionStore::new();
        let session = session(Duration::seconds(-1));
        let id = session.id();
        store.create(session).await;

        let err = store
            .resolve(&id.to_string(), Duration::minutes(30))
            .await
            .expect_err("expired");

        assert_eq!(err, AuthenticationError::SessionExpired { session_id: id });
        assert!(store.find_by_id(&id).await.is_none());
    }

    #[tokio::test]
    async fn unknown_and_malformed_ids_are_invalid() {
        let store = SessionStore::new();

        for value in [SessionId::new().to_string(), "forged".to_string()] {
            let err = store
                .resolve(&value, Duration::minutes(30))
                .await
                .expect_err("invalid");
            assert!(matches!(err, AuthenticationError::InvalidSession { .. }));
        }
    }

    #[tokio::test]
    async fn delete_removes_session() {
        let store = SessionStore::new();
        let session = session(Duration::minutes(30));
        let id = session.id();
        store.create(session).await;

        assert!(store.delete(&id).await);
        assert!(!store.delete(&id).await);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn delete_expired_keeps_live_sessions() {
        let store = SessionStore::new();
        store.create(session(Duration::seconds(-1))).await;
        store.create(session(Duration::seconds(-1))).await;
        store.create(session(Duration::minutes(30))).await;

        assert_eq!(store.delete_expired().await, 2);
        assert_eq!(store.len().await, 1);
        assert_eq!(store.delete_expired().await, 0);
    }

    #[tokio::test]
    async fn clones_share_sessions() {
        let store = SessionStore::new();
        let clone = store.clone();
        let session = session(Duration::minutes(30));
        let id = session.id();

        store.create(session).await;

        assert!(clone.find_by_id(&id).await.is_some());
    }
}
