//! OIDC client implementation using the openidconnect crate.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use google0auth_core::Result;
use google0auth_platform_access::oidc;
use google0auth_platform_access::{OidcClaims, OidcConfig};
use openidconnect::core::{CoreAuthenticationFlow, CoreClient, CoreProviderMetadata};
use openidconnect::{
    AuthorizationCode, ClientId, ClientSecret, CsrfToken, IssuerUrl, Nonce, OAuth2TokenResponse,
    PkceCodeChallenge, PkceCodeVerifier, RedirectUrl, Scope, TokenResponse,
};
use serde::{Deserialize, Serialize};

/// The external identity provider the login flow delegates to.
///
/// The server only needs two things from it: where to send an
/// unauthenticated user, and whether the code they come back with is good.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Short name of the client registration (e.g. "google").
    fn registration_id(&self) -> &str;

    /// Generates the authorization URL for redirecting the user, along with
    /// the state needed to validate the callback.
    fn authorization_url(&self) -> (String, AuthState);

    /// Exchanges the authorization code for tokens and extracts verified claims.
    async fn exchange_code(&self, code: &str, state: &AuthState) -> Result<TokenResult, OidcError>;

    /// Path that starts the login flow for this provider.
    fn login_path(&self) -> String {
        oidc::login_path(self.registration_id())
    }
}

/// Data needed to complete the OIDC callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthState {
    pub csrf_token: String,
    pub pkce_verifier: String,
    pub nonce: String,
}

impl AuthState {
    /// Encodes the state into a cookie-safe string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn encode(&self) -> std::result::Result<String, serde_json::Error> {
        Ok(URL_SAFE_NO_PAD.encode(serde_json::to_vec(self)?))
    }

    /// Decodes a value produced by [`AuthState::encode`].
    #[must_use]
    pub fn decode(value: &str) -> Option<Self> {
        let bytes = URL_SAFE_NO_PAD.decode(value).ok()?;
        serde_json::from_slice(&bytes).ok()
    }
}

/// Result of a successful token exchange.
#[derive(Debug, Clone)]
pub struct TokenResult {
    pub claims: OidcClaims,
    pub access_token: String,
    pub refresh_token: Option<String>,
}

/// OIDC client for Google (or any discoverable OIDC provider).
pub struct OidcClient {
    provider_metadata: CoreProviderMetadata,
    client_id: ClientId,
    client_secret: ClientSecret,
    redirect_url: RedirectUrl,
    http_client: reqwest::Client,
    config: OidcConfig,
}

impl OidcClient {
    /// Creates a new OIDC client by discovering the provider metadata.
    pub async fn discover(config: OidcConfig) -> Result<Self, OidcError> {
        let issuer_url = IssuerUrl::new(config.issuer_url().to_string())
            .map_err(|e| OidcError::Configuration(format!("invalid issuer URL: {}", e)))?;

        // The OIDC client must not follow redirects.
        let http_client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| {
                OidcError::Configuration(format!("failed to create HTTP client: {}", e))
            })?;

        let provider_metadata = CoreProviderMetadata::discover_async(issuer_url, &http_client)
            .await
            .map_err(|e| OidcError::Discovery(format!("failed to discover provider: {}", e)))?;

        let redirect_url = RedirectUrl::new(config.redirect_uri().to_string())
            .map_err(|e| OidcError::Configuration(format!("invalid redirect URI: {}", e)))?;

        if !config.redirect_uri_matches_callback() {
            tracing::warn!(
                redirect_uri = config.redirect_uri(),
                callback_path = %oidc::callback_path(config.registration_id()),
                "Redirect URI does not point at the callback endpoint"
            );
        }

        tracing::info!(
            registration_id = config.registration_id(),
            issuer = config.issuer_url(),
            "Discovered OIDC provider"
        );

        Ok(Self {
            provider_metadata,
            client_id: ClientId::new(config.client_id().to_string()),
            client_secret: ClientSecret::new(config.client_secret().to_string()),
            redirect_url,
            http_client,
            config,
        })
    }
}

#[async_trait]
impl IdentityProvider for OidcClient {
    fn registration_id(&self) -> &str {
        self.config.registration_id()
    }

    fn authorization_url(&self) -> (String, AuthState) {
        let client = CoreClient::from_provider_metadata(
            self.provider_metadata.clone(),
            self.client_id.clone(),
            Some(self.client_secret.clone()),
        )
        .set_redirect_uri(self.redirect_url.clone());

        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let mut auth_request = client
            .authorize_url(
                CoreAuthenticationFlow::AuthorizationCode,
                CsrfToken::new_random,
                Nonce::new_random,
            )
            .set_pkce_challenge(pkce_challenge);

        for scope in self.config.scopes() {
            // openidconnect always sends "openid" itself
            if scope != "openid" {
                auth_request = auth_request.add_scope(Scope::new(scope.to_string()));
            }
        }

        let (auth_url, csrf_token, nonce) = auth_request.url();

        let state = AuthState {
            csrf_token: csrf_token.secret().clone(),
            pkce_verifier: pkce_verifier.secret().clone(),
            nonce: nonce.secret().clone(),
        };

        (auth_url.to_string(), state)
    }

    async fn exchange_code(&self, code: &str, state: &AuthState) -> Result<TokenResult, OidcError> {
        let client = CoreClient::from_provider_metadata(
            self.provider_metadata.clone(),
            self.client_id.clone(),
            Some(self.client_secret.clone()),
        )
        .set_redirect_uri(self.redirect_url.clone());

        let pkce_verifier = PkceCodeVerifier::new(state.pkce_verifier.clone());

        let token_request = client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .map_err(|e| OidcError::TokenExchange(format!("token endpoint error: {}", e)))?;

        let token_response = token_request
            .set_pkce_verifier(pkce_verifier)
            .request_async(&self.http_client)
            .await
            .map_err(|e| OidcError::TokenExchange(format!("token exchange failed: {}", e)))?;

        let id_token = token_response
            .id_token()
            .ok_or_else(|| OidcError::TokenExchange("no ID token in response".to_string()))?;

        let nonce = Nonce::new(state.nonce.clone());
        let claims = id_token
            .claims(&client.id_token_verifier(), &nonce)
            .map_err(|e| {
                OidcError::TokenValidation(format!("ID token validation failed: {}", e))
            })?;

        let display_name: Option<String> = claims
            .name()
            .and_then(|n| n.get(None))
            .map(|n| n.as_str().to_string())
            .or_else(|| claims.preferred_username().map(|u| u.as_str().to_string()));

        let oidc_claims = OidcClaims::new(claims.subject().to_string(), claims.issuer().to_string())
            .with_email(claims.email().map(|e| e.as_str().to_string()))
            .with_email_verified(claims.email_verified().unwrap_or(false))
            .with_display_name(display_name);

        Ok(TokenResult {
            claims: oidc_claims,
            access_token: token_response.access_token().secret().clone(),
            refresh_token: token_response.refresh_token().map(|t| t.secret().clone()),
        })
    }
}

/// OIDC-related errors.
#[derive(Debug)]
pub enum OidcError {
    /// Configuration error (invalid URLs, etc.)
    Configuration(String),
    /// Failed to discover provider metadata.
    Discovery(String),
    /// Token exchange failed.
    TokenExchange(String),
    /// Token validation failed.
    TokenValidation(String),
}

impl std::fmt::Display for OidcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration(msg) => write!(f, "OIDC configuration error: {}", msg),
            Self::Discovery(msg) => write!(f, "OIDC discovery error: {}", msg),
            Self::TokenExchange(msg) => write!(f, "OIDC token exchange error: {}", msg),
            Self::TokenValidation(msg) => write!(f, "OIDC token validation error: {}", msg),
        }
    }
}

impl std::error::Error for OidcError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AuthState {
        AuthState {
            csrf_token: "csrf".to_string(),
            pkce_verifier: "verifier".to_string(),
            nonce: "nonce".to_string(),
        }
    }

    #[test]
    fn encoded_state_is_cookie_safe() {
        let encoded = state().encode().expect("encode");
        assert!(
            encoded
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
        assert_eq!(AuthState::decode(&encoded), Some(state()));
    }

    #[test]
    fn decode_rejects_garbage() {
        assert_eq!(AuthState::decode("not base64!"), None);
        assert_eq!(AuthState::decode(&URL_SAFE_NO_PAD.encode(b"{}")), None);
    }

    #[test]
    fn error_display_names_stage() {
        let err = OidcError::Discovery("timeout".to_string());
        assert_eq!(err.to_string(), "OIDC discovery error: timeout");
    }
}
