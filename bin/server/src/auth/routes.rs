//! OAuth2 login, callback, and logout endpoints.

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use google0auth_core::SessionId;
use google0auth_platform_access::{Principal, Session};
use serde::Deserialize;
use std::sync::Arc;
use time::Duration as TimeDuration;

use super::{
    AUTH_STATE_COOKIE, AppState, SAVED_REQUEST_COOKIE, SESSION_COOKIE, found,
    middleware::{expired_cookie, saved_request},
    oidc::AuthState,
};
use crate::error::AuthError;

/// Where users land after login when no request was saved, and after logout.
const DEFAULT_TARGET: &str = "/";

/// Query parameters for the OAuth2 callback.
///
/// The provider sends either `code` and `state`, or `error`.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

fn check_registration(state: &AppState, registration_id: &str) -> Result<(), AuthError> {
    if registration_id == state.provider.registration_id() {
        Ok(())
    } else {
        Err(AuthError::UnknownRegistration {
            registration_id: registration_id.to_string(),
        })
    }
}

/// Initiates the OAuth2 login flow by redirecting to the identity provider.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Path(registration_id): Path<String>,
    jar: CookieJar,
) -> Result<Response, AuthError> {
    check_registration(&state, &registration_id)?;

    let (auth_url, auth_state) = state.provider.authorization_url();

    // Store the auth state in a secure cookie for validation on callback
    let encoded = auth_state
        .encode()
        .map_err(|e| AuthError::Internal(format!("failed to encode auth state: {e}")))?;

    let cookie = Cookie::build((AUTH_STATE_COOKIE, encoded))
        .path("/")
        .http_only(true)
        .secure(state.session_config.secure_cookies)
        .same_site(SameSite::Lax)
        .max_age(TimeDuration::minutes(10));

    tracing::debug!(registration_id = %registration_id, "Redirecting to identity provider");

    Ok((jar.add(cookie), found(&auth_url)).into_response())
}

/// Handles the redirect back from the identity provider.
pub async fn callback(
    State(state): State<Arc<AppState>>,
    Path(registration_id): Path<String>,
    Query(query): Query<CallbackQuery>,
    jar: CookieJar,
) -> Result<Response, AuthError> {
    check_registration(&state, &registration_id)?;

    if let Some(error) = query.error {
        return Err(AuthError::ProviderDenied {
            error,
            description: query.error_description,
        });
    }

    let code = query
        .code
        .ok_or(AuthError::MissingParameter { name: "code" })?;
    let returned_state = query
        .state
        .ok_or(AuthError::MissingParameter { name: "state" })?;

    // Retrieve and validate auth state from cookie
    let auth_state_cookie = jar
        .get(AUTH_STATE_COOKIE)
        .ok_or(AuthError::MissingAuthState)?;

    let auth_state =
        AuthState::decode(auth_state_cookie.value()).ok_or(AuthError::InvalidAuthState)?;

    if returned_state != auth_state.csrf_token {
        return Err(AuthError::CsrfMismatch);
    }

    let token_result = state
        .provider
        .exchange_code(&code, &auth_state)
        .await
        .map_err(|e| AuthError::TokenExchange(e.to_string()))?;

    let principal = Principal::from_claims(token_result.claims)?;

    let session = Session::with_tokens(
        SessionId::new(),
        principal,
        state.session_config.duration(),
        token_result.access_token,
        token_result.refresh_token,
    );
    let session_id = session.id();

    tracing::info!(
        session_id = %session_id,
        principal_id = %session.principal().id(),
        subject = session.principal().subject(),
        "Login succeeded"
    );

    state.sessions.create(session).await;

    // No max-age: the session expires server-side on idle timeout.
    let session_cookie = Cookie::build((SESSION_COOKIE, session_id.to_string()))
        .path("/")
        .http_only(true)
        .secure(state.session_config.secure_cookies)
        .same_site(SameSite::Lax);

    let target = saved_request(&jar).unwrap_or_else(|| DEFAULT_TARGET.to_string());

    let jar = jar
        .add(session_cookie)
        .add(expired_cookie(AUTH_STATE_COOKIE))
        .add(expired_cookie(SAVED_REQUEST_COOKIE));

    Ok((jar, found(&target)).into_response())
}

/// Logs out the user by deleting their session.
pub async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> impl IntoResponse {
    if let Some(session_cookie) = jar.get(SESSION_COOKIE) {
        if let Ok(session_id) = session_cookie.value().parse::<SessionId>() {
            if state.sessions.delete(&session_id).await {
                tracing::info!(session_id = %session_id, "Logged out");
            }
        }
    }

    (jar.add(expired_cookie(SESSION_COOKIE)), found(DEFAULT_TARGET))
}
