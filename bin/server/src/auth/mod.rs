//! Authentication module for the google0auth server.
//!
//! This module provides:
//! - The security filter chain that enforces the access policy per request
//! - OAuth2 login against an external OIDC provider (Google by default)
//! - In-memory session management
//! - Extractors that hand the resolved authentication to handlers
//!
//! # Request flow
//!
//! Unauthenticated requests to protected paths are redirected to
//! `/oauth2/authorization/{registration_id}`, which redirects on to the
//! provider. The provider returns the user to
//! `/login/oauth2/code/{registration_id}`, where the code is exchanged, a
//! session is created and the user is sent back to the page they first asked
//! for.

pub mod middleware;
pub mod oidc;
pub mod routes;
pub mod store;

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use google0auth_platform_access::AccessPolicy;
use std::sync::Arc;

use crate::config::SessionConfig;

pub use middleware::{OptionalAuth, RequireAuth, SecurityFilterChain, security_filter};
pub use oidc::{AuthState, IdentityProvider, OidcClient, OidcError, TokenResult};
pub use routes::{callback, login, logout};
pub use store::SessionStore;

/// Session cookie name.
pub const SESSION_COOKIE: &str = "session";

/// Auth state cookie name (for CSRF protection during the OAuth2 flow).
pub const AUTH_STATE_COOKIE: &str = "auth_state";

/// Cookie holding the request to return to after login.
pub const SAVED_REQUEST_COOKIE: &str = "saved_request";

/// Logout endpoint.
pub const LOGOUT_PATH: &str = "/logout";

/// Shared application state.
pub struct AppState {
    /// Identity provider the login flow delegates to.
    pub provider: Arc<dyn IdentityProvider>,
    /// Active sessions.
    pub sessions: SessionStore,
    /// Access policy and login entry point.
    pub chain: SecurityFilterChain,
    /// Session configuration.
    pub session_config: SessionConfig,
}

impl AppState {
    /// Creates a new application state. Unauthenticated callers are sent to
    /// the provider's login path.
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        sessions: SessionStore,
        policy: AccessPolicy,
        session_config: SessionConfig,
    ) -> Self {
        let chain = SecurityFilterChain::new(policy, provider.login_path());
        Self {
            provider,
            sessions,
            chain,
            session_config,
        }
    }
}

/// A `302 Found` redirect.
pub(crate) fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}
