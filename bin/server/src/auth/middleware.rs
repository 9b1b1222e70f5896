//! Security filter chain middleware and authentication extractors for Axum.

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{Method, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use google0auth_platform_access::oidc::{AUTHORIZATION_BASE_PATH, CALLBACK_BASE_PATH};
use google0auth_platform_access::{AccessPolicy, AccessRule, Authentication, AuthenticationError};
use std::sync::Arc;
use time::Duration as TimeDuration;

use super::{AppState, LOGOUT_PATH, SAVED_REQUEST_COOKIE, SESSION_COOKIE, found};

/// The access policy plus where to send callers who fail it.
#[derive(Debug, Clone)]
pub struct SecurityFilterChain {
    policy: AccessPolicy,
    login_page: String,
}

impl SecurityFilterChain {
    /// Creates a chain that redirects unauthenticated callers to `login_page`.
    #[must_use]
    pub fn new(policy: AccessPolicy, login_page: String) -> Self {
        Self { policy, login_page }
    }

    /// Returns the access policy.
    #[must_use]
    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    /// Returns the login entry point.
    #[must_use]
    pub fn login_page(&self) -> &str {
        &self.login_page
    }

    /// Returns true for the login, callback and logout endpoints. These run
    /// ahead of the access policy and are always reachable.
    ///
    /// The login and callback paths take exactly one registration segment.
    /// Logout only bypasses the policy for `POST`.
    #[must_use]
    pub fn is_login_endpoint(method: &Method, path: &str) -> bool {
        let one_segment_under = |base: &str| {
            path.strip_prefix(base)
                .and_then(|rest| rest.strip_prefix('/'))
                .is_some_and(|id| !id.is_empty() && !id.contains('/'))
        };
        one_segment_under(AUTHORIZATION_BASE_PATH)
            || one_segment_under(CALLBACK_BASE_PATH)
            || (method == Method::POST && path == LOGOUT_PATH)
    }
}

/// Enforces the access policy on every request.
///
/// Resolves the session cookie once, then either lets the request through
/// with its [`Authentication`] attached to the request extensions, or
/// redirects to the login page.
pub async fn security_filter(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    if SecurityFilterChain::is_login_endpoint(request.method(), &path) {
        return next.run(request).await;
    }

    let resolved = match jar.get(SESSION_COOKIE) {
        Some(cookie) => {
            state
                .sessions
                .resolve(cookie.value(), state.session_config.duration())
                .await
        }
        None => Err(AuthenticationError::MissingSession),
    };

    let (authentication, jar) = match resolved {
        Ok(authentication) => (Some(authentication), jar),
        Err(AuthenticationError::MissingSession) => (None, jar),
        Err(e) => {
            tracing::debug!(error = %e, path = %path, "Discarding unusable session cookie");
            (None, jar.add(expired_cookie(SESSION_COOKIE)))
        }
    };

    let rule = state.chain.policy().evaluate(&path);
    match (rule, authentication) {
        (AccessRule::Authenticated, None) => {
            tracing::debug!(path = %path, "Unauthenticated request, redirecting to login");
            let jar = if request.method() == Method::GET {
                jar.add(saved_request_cookie(&request, &state))
            } else {
                jar
            };
            (jar, found(state.chain.login_page())).into_response()
        }
        (_, authentication) => {
            if let Some(authentication) = authentication {
                request.extensions_mut().insert(authentication);
            }
            (jar, next.run(request).await).into_response()
        }
    }
}

fn saved_request_cookie(request: &Request, state: &AppState) -> Cookie<'static> {
    let target = request
        .uri()
        .path_and_query()
        .map_or_else(|| request.uri().path().to_string(), |pq| pq.to_string());

    Cookie::build((SAVED_REQUEST_COOKIE, URL_SAFE_NO_PAD.encode(target)))
        .path("/")
        .http_only(true)
        .secure(state.session_config.secure_cookies)
        .same_site(SameSite::Lax)
        .max_age(TimeDuration::minutes(10))
        .build()
}

/// Reads back the request saved before the login redirect.
///
/// Only same-origin absolute paths are returned.
#[must_use]
pub fn saved_request(jar: &CookieJar) -> Option<String> {
    let cookie = jar.get(SAVED_REQUEST_COOKIE)?;
    let bytes = URL_SAFE_NO_PAD.decode(cookie.value()).ok()?;
    let target = String::from_utf8(bytes).ok()?;
    is_local_path(&target).then_some(target)
}

fn is_local_path(target: &str) -> bool {
    target.starts_with('/')
        && !target.starts_with("//")
        && !target.contains('\\')
        && !target.chars().any(|c| c.is_ascii_control())
}

/// A removal cookie for `name`.
pub(crate) fn expired_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build((name, ""))
        .path("/")
        .max_age(TimeDuration::ZERO)
        .build()
}

/// Extractor for requiring an authenticated principal.
///
/// Reads the [`Authentication`] the security filter attached to the request.
/// If there is none, the caller is redirected to the login page.
pub struct RequireAuth(pub Authentication);

impl<S> FromRequestParts<S> for RequireAuth
where
    Arc<AppState>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = Arc::<AppState>::from_ref(state);
        parts
            .extensions
            .get::<Authentication>()
            .cloned()
            .map(RequireAuth)
            .ok_or_else(|| AuthRejection::NotAuthenticated {
                login_page: app_state.chain.login_page().to_string(),
            })
    }
}

/// Extractor for optionally getting the authenticated principal.
///
/// Returns None if the user is not authenticated.
pub struct OptionalAuth(pub Option<Authentication>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalAuth(parts.extensions.get::<Authentication>().cloned()))
    }
}

/// Rejection type for authentication extractors.
#[derive(Debug)]
pub enum AuthRejection {
    NotAuthenticated { login_page: String },
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::NotAuthenticated { login_page } => found(&login_page),
        }
    }
}
