//! Platform access for google0auth: who may reach what.
//!
//! This crate provides:
//! - The access policy (`AccessPolicy`, `PathPattern`, `AccessRule`)
//! - The identity provider registration (`OidcConfig`)
//! - Signed-in identities and their sessions (`Principal`, `Session`)
//! - The per-request authentication result (`Authentication`)
//!
//! # Access Control Model
//!
//! Access is binary. A path is either public or requires an authenticated
//! principal; nothing finer-grained is modelled. Authentication itself is
//! delegated to an external OIDC provider (Google by default).
//!
//! # Example
//!
//! ```
//! use chrono::Duration;
//! use google0auth_core::SessionId;
//! use google0auth_platform_access::{AccessPolicy, Authentication, OidcClaims, Principal, Session};
//!
//! let policy = AccessPolicy::permit_all_then_authenticated(["/api/public"]).unwrap();
//! assert!(policy.requires_authentication("/api/private"));
//!
//! let claims = OidcClaims::new(
//!     "110169484474386276334".to_string(),
//!     "https://accounts.google.com".to_string(),
//! );
//! let principal = Principal::from_claims(claims).unwrap();
//! let session = Session::new(SessionId::new(), principal, Duration::minutes(30));
//! let auth = Authentication::new(session);
//! assert_eq!(auth.principal().name(), "110169484474386276334");
//! ```

pub mod auth;
pub mod error;
pub mod oidc;
pub mod policy;
pub mod principal;
pub mod session;

pub use auth::{Authentication, OidcClaims};
pub use error::{AuthenticationError, PolicyError};
pub use oidc::{OidcConfig, OidcConfigBuilder};
pub use policy::{AccessPolicy, AccessPolicyBuilder, AccessRule, PathPattern};
pub use principal::Principal;
pub use session::Session;
