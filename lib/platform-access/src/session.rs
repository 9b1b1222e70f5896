//! Session management for authenticated users.
//!
//! A session is created once the OAuth2 login callback has verified the
//! user's ID token. It carries the principal and the provider tokens, and
//! expires after a period of inactivity.

use chrono::{DateTime, Duration, Utc};
use google0auth_core::SessionId;
use serde::{Deserialize, Serialize};

use crate::principal::Principal;

/// Represents an active authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier for this session.
    id: SessionId,
    /// Who the session belongs to.
    principal: Principal,
    /// When the session was created.
    created_at: DateTime<Utc>,
    /// When the session expires unless it is used again.
    expires_at: DateTime<Utc>,
    /// OAuth2 access token issued by the provider.
    access_token: Option<String>,
    /// OAuth2 refresh token, only present when offline access was granted.
    refresh_token: Option<String>,
}

impl Session {
    /// Creates a new session for the given principal.
    ///
    /// The session is valid for the specified duration.
    #[must_use]
    pub fn new(id: SessionId, principal: Principal, duration: Duration) -> Self {
        let now = Utc::now();
        Self {
            id,
            principal,
            created_at: now,
            expires_at: now + duration,
            access_token: None,
            refresh_token: None,
        }
    }

    /// Creates a session with OAuth2 tokens.
    #[must_use]
    pub fn with_tokens(
        id: SessionId,
        principal: Principal,
        duration: Duration,
        access_token: String,
        refresh_token: Option<String>,
    ) -> Self {
        let mut session = Self::new(id, principal, duration);
        session.access_token = Some(access_token);
        session.refresh_token = refresh_token;
        session
    }

    /// Returns the session ID.
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Returns the signed-in principal.
    #[must_use]
    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    /// Returns when the session was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the session expires.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns the OAuth2 access token, if present.
    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// Returns the OAuth2 refresh token, if present.
    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    /// Returns true if the session has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Returns true if the session has expired as of `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Returns true if the session is still valid (not expired).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.is_expired()
    }

    /// Pushes the expiry out to `duration` from now. Sessions are idle-timed:
    /// every authenticated request extends them.
    pub fn touch(&mut self, duration: Duration) {
        let extended = Utc::now() + duration;
        if extended > self.expires_at {
            self.expires_at = extended;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal() -> Principal {
        Principal::new("sub_123".to_string(), "https://accounts.google.com".to_string())
    }

    #[test]
    fn new_session_has_correct_fields() {
        let session_id = SessionId::new();
        let principal = principal();

        let before = Utc::now();
        let session = Session::new(session_id, principal.clone(), Duration::hours(1));
        let after = Utc::now();

        assert_eq!(session.id(), session_id);
        assert_eq!(session.principal(), &principal);
        assert!(session.created_at() >= before);
        assert!(session.created_at() <= after);
        assert!(session.expires_at() > session.created_at());
        assert!(session.access_token().is_none());
        assert!(session.refresh_token().is_none());
    }

    #[test]
    fn session_with_tokens() {
        let session = Session::with_tokens(
            SessionId::new(),
            principal(),
            Duration::hours(1),
            "ya29.access".to_string(),
            Some("1//refresh".to_string()),
        );

        assert_eq!(session.access_token(), Some("ya29.access"));
        assert_eq!(session.refresh_token(), Some("1//refresh"));
    }

    #[test]
    fn session_expiration() {
        // Create a session that expires immediately
        let session = Session::new(SessionId::new(), principal(), Duration::seconds(-1));

        assert!(session.is_expired());
        assert!(!session.is_valid());
    }

    #[test]
    fn session_not_expired() {
        let session = Session::new(SessionId::new(), principal(), Duration::hours(1));

        assert!(!session.is_expired());
        assert!(session.is_valid());
        assert!(session.is_expired_at(session.expires_at()));
    }

    #[test]
    fn touch_extends_expiry() {
        let mut session = Session::new(SessionId::new(), principal(), Duration::seconds(1));
        let old_expires = session.expires_at();

        session.touch(Duration::minutes(30));

        assert!(session.expires_at() > old_expires);
    }

    #[test]
    fn touch_never_shortens_expiry() {
        let mut session = Session::new(SessionId::new(), principal(), Duration::hours(2));
        let old_expires = session.expires_at();

        session.touch(Duration::minutes(1));

        assert_eq!(session.expires_at(), old_expires);
    }
}
