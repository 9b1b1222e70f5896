//! Centralized server configuration.
//!
//! This module provides strongly-typed configuration for the server,
//! loaded via the `config` crate from environment variables. Nested keys
//! use `__` as separator, e.g. `OIDC__CLIENT_ID` or `SESSION__SECURE_COOKIES`.
//!
//! See [`OidcConfig`] for the identity provider registration.

use chrono::Duration;
use google0auth_platform_access::{AccessPolicy, OidcConfig, PolicyError};
use rootcause::Report;
use serde::Deserialize;
use std::fmt;

/// Server configuration composed from library configs.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Session configuration.
    #[serde(default)]
    pub session: SessionConfig,

    /// Access policy configuration.
    #[serde(default)]
    pub security: SecurityConfig,

    /// OIDC authentication configuration.
    pub oidc: OidcConfig,
}

fn default_listen_addr() -> String {
    "127.0.0.1:8080".to_string()
}

/// Session-related configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Idle timeout of a session in minutes. Each authenticated request
    /// restarts the clock.
    #[serde(default = "default_session_duration_minutes")]
    pub duration_minutes: i64,

    /// Interval between session cleanup runs, in seconds.
    #[serde(default = "default_cleanup_interval_seconds")]
    pub cleanup_interval_seconds: u64,

    /// Whether to set the Secure flag on cookies (requires HTTPS).
    /// Defaults to true for production safety; set to false for local HTTP development.
    #[serde(default = "default_secure_cookies")]
    pub secure_cookies: bool,
}

fn default_session_duration_minutes() -> i64 {
    30
}

fn default_cleanup_interval_seconds() -> u64 {
    300
}

fn default_secure_cookies() -> bool {
    true
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration_minutes: default_session_duration_minutes(),
            cleanup_interval_seconds: default_cleanup_interval_seconds(),
            secure_cookies: default_secure_cookies(),
        }
    }
}

/// Longest idle timeout accepted from configuration: 30 days.
pub const MAX_SESSION_DURATION_MINUTES: i64 = 30 * 24 * 60;

impl SessionConfig {
    /// Returns the idle timeout as a duration, clamped to
    /// `1..=MAX_SESSION_DURATION_MINUTES`.
    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::minutes(
            self.duration_minutes
                .clamp(1, MAX_SESSION_DURATION_MINUTES),
        )
    }

    /// Checks the values loaded from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the idle timeout is outside
    /// `1..=MAX_SESSION_DURATION_MINUTES` or the cleanup interval is zero.
    pub fn validate(&self) -> Result<(), Report<SessionConfigError>> {
        if !(1..=MAX_SESSION_DURATION_MINUTES).contains(&self.duration_minutes) {
            return Err(SessionConfigError::DurationOutOfRange {
                minutes: self.duration_minutes,
            }
            .into());
        }
        if self.cleanup_interval_seconds == 0 {
            return Err(SessionConfigError::ZeroCleanupInterval.into());
        }
        Ok(())
    }
}

/// Invalid session configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionConfigError {
    /// `duration_minutes` is not a usable idle timeout.
    DurationOutOfRange { minutes: i64 },
    /// `cleanup_interval_seconds` is zero.
    ZeroCleanupInterval,
}

impl fmt::Display for SessionConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DurationOutOfRange { minutes } => write!(
                f,
                "session duration of {minutes} minutes is outside 1..={MAX_SESSION_DURATION_MINUTES}"
            ),
            Self::ZeroCleanupInterval => write!(f, "session cleanup interval must be non-zero"),
        }
    }
}

impl std::error::Error for SessionConfigError {}

/// Which paths skip authentication.
#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    /// Comma-separated path patterns anyone may reach. Everything else
    /// requires an authenticated session.
    #[serde(default = "default_permit_all")]
    pub permit_all: String,
}

fn default_permit_all() -> String {
    "/api/public".to_string()
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            permit_all: default_permit_all(),
        }
    }
}

impl SecurityConfig {
    /// Builds the access policy: the permit-all patterns in order, then
    /// "any request authenticated".
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern is malformed.
    pub fn access_policy(&self) -> Result<AccessPolicy, Report<PolicyError>> {
        AccessPolicy::permit_all_then_authenticated(
            self.permit_all
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty()),
        )
    }
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required configuration is missing or invalid.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
