//! API handlers.

use axum::{http::StatusCode, response::IntoResponse};

use crate::auth::RequireAuth;

/// Path of the endpoint anyone may call.
pub const PUBLIC_PATH: &str = "/api/public";

/// Path of the endpoint that needs a signed-in user.
pub const PRIVATE_PATH: &str = "/api/private";

/// Body returned by the public endpoint.
pub const PUBLIC_MESSAGE: &str = "this is the public method1";

/// Body returned by the private endpoint.
pub const PRIVATE_MESSAGE: &str = "this is the public method2";

/// `GET /api/public`
pub async fn public_endpoint() -> &'static str {
    PUBLIC_MESSAGE
}

/// `GET /api/private`
pub async fn private_endpoint(RequireAuth(auth): RequireAuth) -> &'static str {
    tracing::debug!(
        principal_id = %auth.principal_id(),
        session_id = %auth.session_id(),
        "Serving private endpoint"
    );
    PRIVATE_MESSAGE
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not found")
}
