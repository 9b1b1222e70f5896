//! Authentication results handed to the web layer.
//!
//! - `Authentication`: who the current request is acting as
//! - `OidcClaims`: the subset of verified ID token claims we consume

use google0auth_core::{PrincipalId, SessionId};

use crate::principal::Principal;
use crate::session::Session;

/// The outcome of successfully authenticating a request.
///
/// The security filter chain resolves this once per request and passes it
/// to handlers explicitly, so handlers never look up the caller themselves.
#[derive(Debug, Clone)]
pub struct Authentication {
    session: Session,
}

impl Authentication {
    /// Wraps a live session.
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// Returns the authenticated principal.
    #[must_use]
    pub fn principal(&self) -> &Principal {
        self.session.principal()
    }

    /// Returns the principal's local ID.
    #[must_use]
    pub fn principal_id(&self) -> PrincipalId {
        self.session.principal().id()
    }

    /// Returns the ID of the session backing this authentication.
    #[must_use]
    pub fn session_id(&self) -> SessionId {
        self.session.id()
    }

    /// Returns the current session.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }
}

/// Claims extracted from a verified OIDC ID token.
#[derive(Debug, Clone, Default)]
pub struct OidcClaims {
    /// The subject claim (unique user identifier from the provider).
    pub subject: String,
    /// The issuer URL.
    pub issuer: String,
    /// Email address (optional).
    pub email: Option<String>,
    /// Whether the provider verified the email address.
    pub email_verified: bool,
    /// Display name (optional, from name or preferred_username).
    pub display_name: Option<String>,
}

impl OidcClaims {
    /// Creates a new set of OIDC claims.
    #[must_use]
    pub fn new(subject: String, issuer: String) -> Self {
        Self {
            subject,
            issuer,
            ..Self::default()
        }
    }

    /// Sets the email claim.
    #[must_use]
    pub fn with_email(mut self, email: Option<String>) -> Self {
        self.email = email;
        self
    }

    /// Sets the email_verified claim.
    #[must_use]
    pub fn with_email_verified(mut self, verified: bool) -> Self {
        self.email_verified = verified;
        self
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_display_name(mut self, name: Option<String>) -> Self {
        self.display_name = name;
        self
    }
}
