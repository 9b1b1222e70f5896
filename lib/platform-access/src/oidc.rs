//! OAuth2 client registration for the OIDC identity provider.
//!
//! A registration describes one provider (Google by default): its issuer,
//! the client credentials issued to us, and the redirect URI the provider
//! sends users back to. The registration id also names the login and
//! callback paths, `/oauth2/authorization/{id}` and `/login/oauth2/code/{id}`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Issuer URL for Google accounts.
pub const GOOGLE_ISSUER_URL: &str = "https://accounts.google.com";

/// Base path of the login entry points.
pub const AUTHORIZATION_BASE_PATH: &str = "/oauth2/authorization";

/// Base path of the redirect-URI callbacks.
pub const CALLBACK_BASE_PATH: &str = "/login/oauth2/code";

/// Path that starts the login flow for `registration_id`.
#[must_use]
pub fn login_path(registration_id: &str) -> String {
    format!("{AUTHORIZATION_BASE_PATH}/{registration_id}")
}

/// Path the provider redirects back to for `registration_id`.
#[must_use]
pub fn callback_path(registration_id: &str) -> String {
    format!("{CALLBACK_BASE_PATH}/{registration_id}")
}

/// Configuration for the OIDC identity provider.
///
/// Fields with defaults can be omitted when loading from environment variables.
#[derive(Clone, Serialize, Deserialize)]
pub struct OidcConfig {
    /// Short name of the registration, used in the login and callback paths.
    /// Default: "google"
    #[serde(default = "default_registration_id")]
    registration_id: String,
    /// The OIDC issuer URL. Used for OIDC discovery.
    /// Default: "https://accounts.google.com"
    #[serde(default = "default_issuer_url")]
    issuer_url: String,
    /// The OAuth2 client ID registered with the provider.
    client_id: String,
    /// The OAuth2 client secret.
    client_secret: String,
    /// The redirect URI for the OAuth2 callback.
    /// Default: "http://localhost:8080/login/oauth2/code/google"
    #[serde(default = "default_redirect_uri")]
    redirect_uri: String,
    /// OAuth2 scopes to request as a comma-separated string.
    /// Default: "openid,profile,email"
    #[serde(default = "default_scopes")]
    scopes: String,
}

fn default_registration_id() -> String {
    "google".to_string()
}

fn default_issuer_url() -> String {
    GOOGLE_ISSUER_URL.to_string()
}

fn default_redirect_uri() -> String {
    format!("http://localhost:8080{CALLBACK_BASE_PATH}/google")
}

fn default_scopes() -> String {
    "openid,profile,email".to_string()
}

impl OidcConfig {
    /// Creates a Google registration with defaults for optional fields.
    #[must_use]
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            registration_id: default_registration_id(),
            issuer_url: default_issuer_url(),
            client_id,
            client_secret,
            redirect_uri: default_redirect_uri(),
            scopes: default_scopes(),
        }
    }

    /// Creates a configuration builder for more customization.
    #[must_use]
    pub fn builder(client_id: String, client_secret: String) -> OidcConfigBuilder {
        OidcConfigBuilder::new(client_id, client_secret)
    }

    /// Returns the registration id.
    #[must_use]
    pub fn registration_id(&self) -> &str {
        &self.registration_id
    }

    /// Returns the OIDC issuer URL.
    #[must_use]
    pub fn issuer_url(&self) -> &str {
        &self.issuer_url
    }

    /// Returns the OAuth2 client ID.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Returns the OAuth2 client secret.
    #[must_use]
    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    /// Returns the OAuth2 redirect URI.
    #[must_use]
    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    /// Returns the OAuth2 scopes to request, parsed from comma-separated string.
    #[must_use]
    pub fn scopes(&self) -> Vec<&str> {
        self.scopes
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Returns true if the redirect URI points at this registration's
    /// callback path.
    #[must_use]
    pub fn redirect_uri_matches_callback(&self) -> bool {
        let callback = callback_path(&self.registration_id);
        let without_query = self
            .redirect_uri
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        without_query.ends_with(&callback)
    }
}

impl fmt::Debug for OidcConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OidcConfig")
            .field("registration_id", &self.registration_id)
            .field("issuer_url", &self.issuer_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .field("scopes", &self.scopes)
            .finish()
    }
}

/// Builder for `OidcConfig`.
#[derive(Debug)]
pub struct OidcConfigBuilder {
    config: OidcConfig,
    scopes: Vec<String>,
}

impl OidcConfigBuilder {
    /// Creates a new builder for a Google registration.
    #[must_use]
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            config: OidcConfig::new(client_id, client_secret),
            scopes: vec![
                "openid".to_string(),
                "profile".to_string(),
                "email".to_string(),
            ],
        }
    }

    /// Sets the registration id.
    #[must_use]
    pub fn registration_id(mut self, id: String) -> Self {
        self.config.registration_id = id;
        self
    }

    /// Sets the issuer URL used for discovery.
    #[must_use]
    pub fn issuer_url(mut self, url: String) -> Self {
        self.config.issuer_url = url;
        self
    }

    /// Sets the redirect URI.
    #[must_use]
    pub fn redirect_uri(mut self, uri: String) -> Self {
        self.config.redirect_uri = uri;
        self
    }

    /// Sets the OAuth2 scopes to request.
    #[must_use]
    pub fn scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Adds a scope to the list of scopes to request.
    #[must_use]
    pub fn add_scope(mut self, scope: String) -> Self {
        if !self.scopes.contains(&scope) {
            self.scopes.push(scope);
        }
        self
    }

    /// Builds the `OidcConfig`.
    #[must_use]
    pub fn build(mut self) -> OidcConfig {
        self.config.scopes = self.scopes.join(",");
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_config_has_google_defaults() {
        let config = OidcConfig::new("client-id".to_string(), "client-secret".to_string());

        assert_eq!(config.registration_id(), "google");
        assert_eq!(config.issuer_url(), "https://accounts.google.com");
        assert_eq!(config.client_id(), "client-id");
        assert_eq!(config.client_secret(), "client-secret");
        assert_eq!(
            config.redirect_uri(),
            "http://localhost:8080/login/oauth2/code/google"
        );
        assert_eq!(config.scopes(), vec!["openid", "profile", "email"]);
    }

    #[test]
    fn paths_follow_registration_id() {
        assert_eq!(login_path("google"), "/oauth2/authorization/google");
        assert_eq!(callback_path("google"), "/login/oauth2/code/google");
        assert_eq!(login_path("corp"), "/oauth2/authorization/corp");
        assert_eq!(callback_path("corp"), "/login/oauth2/code/corp");
    }

    #[test]
    fn default_redirect_uri_matches_callback() {
        let config = OidcConfig::new("id".to_string(), "secret".to_string());
        assert!(config.redirect_uri_matches_callback());
    }

    #[test]
    fn redirect_uri_for_other_registration_does_not_match() {
        let config = OidcConfig::builder("id".to_string(), "secret".to_string())
            .registration_id("corp".to_string())
            .build();
        assert!(!config.redirect_uri_matches_callback());

        let fixed = OidcConfig::builder("id".to_string(), "secret".to_string())
            .registration_id("corp".to_string())
            .redirect_uri("https://app.example.com/login/oauth2/code/corp?x=1".to_string())
            .build();
        assert!(fixed.redirect_uri_matches_callback());
    }

    #[test]
    fn builder_allows_customization() {
        let config = OidcConfig::builder("client-id".to_string(), "client-secret".to_string())
            .issuer_url("https://auth.example.com".to_string())
            .redirect_uri("https://app.example.com/login/oauth2/code/google".to_string())
            .add_scope("https://www.googleapis.com/auth/calendar.readonly".to_string())
            .build();

        assert_eq!(config.issuer_url(), "https://auth.example.com");
        assert_eq!(
            config.redirect_uri(),
            "https://app.example.com/login/oauth2/code/google"
        );
        assert!(
            config
                .scopes()
                .contains(&"https://www.googleapis.com/auth/calendar.readonly")
        );
    }

    #[test]
    fn builder_add_scope_does_not_duplicate() {
        let config = OidcConfig::builder("client-id".to_string(), "client-secret".to_string())
            .add_scope("openid".to_string())
            .build();

        let openid_count = config.scopes().iter().filter(|s| **s == "openid").count();
        assert_eq!(openid_count, 1);
    }

    #[test]
    fn debug_output_redacts_secret() {
        let config = OidcConfig::new("client-id".to_string(), "hunter2".to_string());
        let debug = format!("{config:?}");
        assert!(debug.contains("client-id"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let json = r#"{
            "client_id": "my-client",
            "client_secret": "secret"
        }"#;

        let config: OidcConfig = serde_json::from_str(json).expect("deserialize");

        assert_eq!(config.registration_id(), "google");
        assert_eq!(config.issuer_url(), GOOGLE_ISSUER_URL);
        assert_eq!(config.client_id(), "my-client");
        assert_eq!(config.scopes(), vec!["openid", "profile", "email"]);
    }

    #[test]
    fn config_requires_client_credentials() {
        let json = r#"{ "client_id": "my-client" }"#;
        assert!(serde_json::from_str::<OidcConfig>(json).is_err());
    }

    #[test]
    fn scopes_parses_comma_separated() {
        let json = r#"{
            "client_id": "my-client",
            "client_secret": "secret",
            "scopes": "openid, email, , profile"
        }"#;

        let config: OidcConfig = serde_json::from_str(json).expect("deserialize");

        assert_eq!(config.scopes(), vec!["openid", "email", "profile"]);
    }
}
