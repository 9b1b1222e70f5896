//! Error types for the platform-access crate.
//!
//! Errors are designed for layered context using rootcause:
//! - `PolicyError`: Access policy construction failures
//! - `AuthenticationError`: Failures resolving who the caller is

use google0auth_core::SessionId;
use std::fmt;

/// Errors from building an access policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// A path pattern could not be parsed.
    InvalidPattern { pattern: String, reason: String },
}

impl fmt::Display for PolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPattern { pattern, reason } => {
                write!(f, "invalid path pattern '{pattern}': {reason}")
            }
        }
    }
}

impl std::error::Error for PolicyError {}

/// Errors from authentication operations.
///
/// These errors represent failures in verifying user identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthenticationError {
    /// The request carried no session cookie.
    MissingSession,
    /// Session cookie is malformed or names no known session.
    InvalidSession { session_id: String },
    /// Session has expired.
    SessionExpired { session_id: SessionId },
    /// A claim the principal needs was absent from the ID token.
    MissingClaim { claim: String },
}

impl fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSession => write!(f, "no session cookie"),
            Self::InvalidSession { session_id } => {
                write!(f, "invalid session: {session_id}")
            }
            Self::SessionExpired { session_id } => {
                write!(f, "session has expired: {session_id}")
            }
            Self::MissingClaim { claim } => {
                write!(f, "missing required claim: {claim}")
            }
        }
    }
}

impl std::error::Error for AuthenticationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_error_names_pattern_and_reason() {
        let err = PolicyError::InvalidPattern {
            pattern: "api/*".to_string(),
            reason: "pattern must start with '/'".to_string(),
        };
        assert!(err.to_string().contains("api/*"));
        assert!(err.to_string().contains("must start with"));
    }

    #[test]
    fn authentication_error_invalid_session_display() {
        let err = AuthenticationError::InvalidSession {
            session_id: "sess_123".to_string(),
        };
        assert!(err.to_string().contains("invalid session"));
        assert!(err.to_string().contains("sess_123"));
    }

    #[test]
    fn authentication_error_expired_display() {
        let id = SessionId::new();
        let err = AuthenticationError::SessionExpired { session_id: id };
        assert!(err.to_string().contains("expired"));
        assert!(err.to_string().contains(&id.to_string()));
    }

    #[test]
    fn authentication_error_missing_claim_display() {
        let err = AuthenticationError::MissingClaim {
            claim: "sub".to_string(),
        };
        assert_eq!(err.to_string(), "missing required claim: sub");
    }
}
