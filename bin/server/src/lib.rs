//! google0auth web server.
//!
//! Serves a public and a private endpoint. Everything except the public one
//! sits behind Google OAuth2 login, enforced by a security filter chain
//! middleware in front of the router.

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod error;
