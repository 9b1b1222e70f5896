//! Core types shared by the google0auth crates.
//!
//! Provides the `Result` alias used for layered error reporting and the
//! strongly-typed identifiers for principals and sessions.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::{ParseIdError, PrincipalId, SessionId};
