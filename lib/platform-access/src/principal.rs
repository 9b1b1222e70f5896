//! The signed-in principal.
//!
//! A `Principal` is built from verified ID token claims when a login
//! completes. It lives only inside its session; nothing is persisted.

use chrono::{DateTime, Utc};
use google0auth_core::PrincipalId;
use serde::{Deserialize, Serialize};

use crate::auth::OidcClaims;
use crate::error::AuthenticationError;

/// Represents the identity behind an authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Local identifier, assigned at sign-in.
    id: PrincipalId,
    /// OIDC subject claim - unique identifier from the identity provider.
    subject: String,
    /// OIDC issuer URL - identifies which identity provider authenticated the user.
    issuer: String,
    /// Email address (from the OIDC email claim, if granted).
    email: Option<String>,
    /// Whether the provider has verified the email address.
    email_verified: bool,
    /// Display name (from the OIDC name or preferred_username claim).
    display_name: Option<String>,
    /// When the provider authenticated the user.
    authenticated_at: DateTime<Utc>,
}

impl Principal {
    /// Creates a principal for the given subject and issuer.
    #[must_use]
    pub fn new(subject: String, issuer: String) -> Self {
        Self {
            id: PrincipalId::new(),
            subject,
            issuer,
            email: None,
            email_verified: false,
            display_name: None,
            authenticated_at: Utc::now(),
        }
    }

    /// Builds a principal from ID token claims.
    ///
    /// # Errors
    ///
    /// Returns `MissingClaim` if the subject or issuer is empty.
    pub fn from_claims(claims: OidcClaims) -> Result<Self, AuthenticationError> {
        if claims.subject.is_empty() {
            return Err(AuthenticationError::MissingClaim {
                claim: "sub".to_string(),
            });
        }
        if claims.issuer.is_empty() {
            return Err(AuthenticationError::MissingClaim {
                claim: "iss".to_string(),
            });
        }

        let mut principal = Self::new(claims.subject, claims.issuer);
        principal.email = claims.email;
        principal.email_verified = claims.email_verified;
        principal.display_name = claims.display_name;
        Ok(principal)
    }

    /// Returns the principal's local ID.
    #[must_use]
    pub fn id(&self) -> PrincipalId {
        self.id
    }

    /// Returns the principal's name, which is the OIDC subject.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.subject
    }

    /// Returns the OIDC subject claim.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Returns the OIDC issuer URL.
    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Returns the email address, if available.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns true if the provider vouched for the email address.
    #[must_use]
    pub fn email_verified(&self) -> bool {
        self.email_verified
    }

    /// Returns the display name, if available.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Returns when the provider authenticated the user.
    #[must_use]
    pub fn authenticated_at(&self) -> DateTime<Utc> {
        self.authenticated_at
    }
}
