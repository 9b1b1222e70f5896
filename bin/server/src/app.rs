//! Router assembly.
//!
//! Routes are listed explicitly in [`api_routes`]; the security filter chain
//! wraps all of them, the login endpoints and the fallback.

use axum::{
    Router, middleware,
    routing::{MethodRouter, get, post},
};
use google0auth_platform_access::oidc::{AUTHORIZATION_BASE_PATH, CALLBACK_BASE_PATH};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::auth::{self, AppState, LOGOUT_PATH};

/// One entry of the route table.
pub type ApiRoute = (&'static str, MethodRouter<Arc<AppState>>);

/// The application's route table, in registration order.
pub fn api_routes() -> Vec<ApiRoute> {
    vec![
        (api::PUBLIC_PATH, get(api::public_endpoint)),
        (api::PRIVATE_PATH, get(api::private_endpoint)),
    ]
}

/// Builds the full application router.
pub fn router(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        .route(
            &format!("{AUTHORIZATION_BASE_PATH}/{{registration_id}}"),
            get(auth::login),
        )
        .route(
            &format!("{CALLBACK_BASE_PATH}/{{registration_id}}"),
            get(auth::callback),
        )
        .route(LOGOUT_PATH, post(auth::logout));

    for (path, handler) in api_routes() {
        router = router.route(path, handler);
    }

    router
        .fallback(api::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    auth::security_filter,
                )),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_table_lists_both_endpoints_in_order() {
        let paths: Vec<&str> = api_routes().into_iter().map(|(path, _)| path).collect();
        assert_eq!(paths, vec!["/api/public", "/api/private"]);
    }
}
