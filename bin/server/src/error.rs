//! HTTP-facing error types for the login flow.
//!
//! Internal details are logged; clients only see a short, safe message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use google0auth_platform_access::AuthenticationError;
use std::fmt;

/// Errors raised by the login, callback and logout endpoints.
#[derive(Debug)]
pub enum AuthError {
    /// No identity provider is registered under this id.
    UnknownRegistration { registration_id: String },
    /// The provider redirected back with an error (e.g. the user declined).
    ProviderDenied {
        error: String,
        description: Option<String>,
    },
    /// The callback lacked `code` or `state`.
    MissingParameter { name: &'static str },
    /// No auth state cookie; the login was not started here or it timed out.
    MissingAuthState,
    /// The auth state cookie could not be decoded.
    InvalidAuthState,
    /// The `state` parameter does not match the one we issued.
    CsrfMismatch,
    /// Exchanging the authorization code failed.
    TokenExchange(String),
    /// The verified claims cannot back a principal.
    Authentication(AuthenticationError),
    /// Anything else that should not happen.
    Internal(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownRegistration { registration_id } => {
                write!(f, "unknown client registration '{registration_id}'")
            }
            Self::ProviderDenied { error, description } => match description {
                Some(description) => write!(f, "provider returned {error}: {description}"),
                None => write!(f, "provider returned {error}"),
            },
            Self::MissingParameter { name } => write!(f, "missing '{name}' parameter"),
            Self::MissingAuthState => write!(f, "missing auth state"),
            Self::InvalidAuthState => write!(f, "invalid auth state"),
            Self::CsrfMismatch => write!(f, "CSRF token mismatch"),
            Self::TokenExchange(msg) => write!(f, "token exchange failed: {msg}"),
            Self::Authentication(e) => write!(f, "authentication failed: {e}"),
            Self::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<AuthenticationError> for AuthError {
    fn from(e: AuthenticationError) -> Self {
        Self::Authentication(e)
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::UnknownRegistration { .. } => (StatusCode::NOT_FOUND, "Not found"),
            Self::ProviderDenied { .. } => {
                tracing::warn!(error = %self, "Login rejected by identity provider");
                (StatusCode::UNAUTHORIZED, "Login failed")
            }
            Self::MissingParameter { .. } => (StatusCode::BAD_REQUEST, "Invalid login callback"),
            Self::MissingAuthState => (StatusCode::BAD_REQUEST, "Missing auth state"),
            Self::InvalidAuthState => (StatusCode::BAD_REQUEST, "Invalid auth state"),
            Self::CsrfMismatch => (StatusCode::BAD_REQUEST, "CSRF token mismatch"),
            Self::TokenExchange(msg) => {
                tracing::error!("Token exchange failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Authentication failed")
            }
            Self::Authentication(e) => {
                tracing::warn!(error = %e, "Rejected ID token claims");
                (StatusCode::UNAUTHORIZED, "Login failed")
            }
            Self::Internal(msg) => {
                tracing::error!("Internal error during login: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, message).into_response()
    }
}
