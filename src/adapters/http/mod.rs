//! HTTP adapters - REST API implementations.
//!
//! The order endpoints are mounted twice, once per `RouteKind`, each tree
//! behind its own authentication layer.

pub mod middleware;
pub mod order;

use std::time::Duration;

use axum::{
    http::{HeaderValue, StatusCode},
    middleware::from_fn_with_state,
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::domain::foundation::RouteKind;

// Re-export key types for convenience
pub use middleware::{auth_middleware, AuthState, RequireAuth};
pub use order::{order_routes, OrderHandlers};

/// Cross-cutting HTTP settings.
#[derive(Debug, Clone)]
pub struct RouterSettings {
    pub request_timeout: Duration,
    /// Allowed CORS origins; empty disables CORS, `*` allows any origin.
    pub cors_origins: Vec<String>,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            cors_origins: Vec::new(),
        }
    }
}

/// Builds the complete application router.
pub fn app_router(handlers: OrderHandlers, auth: AuthState, settings: &RouterSettings) -> Router {
    let trees = [RouteKind::Admin, RouteKind::Public]
        .into_iter()
        .fold(Router::new(), |router, route| {
            router.merge(
                order_routes(handlers.for_route(route))
                    .route_layer(from_fn_with_state(auth.for_route(route), auth_middleware)),
            )
        });

    let router = Router::new()
        .route("/health", get(health))
        .merge(trees)
        .layer(TimeoutLayer::new(settings.request_timeout))
        .layer(TraceLayer::new_for_http());

    match cors_layer(&settings.cors_origins) {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

/// GET /health - Liveness probe
async fn health() -> StatusCode {
    StatusCode::OK
}

fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    if origins.is_empty() {
        return None;
    }
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.iter().any(|o| o == "*") {
        return Some(layer.allow_origin(Any));
    }
    let parsed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    Some(layer.allow_origin(parsed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cors_disabled_without_origins() {
        assert!(cors_layer(&[]).is_none());
    }

    #[test]
    fn cors_enabled_for_listed_origins() {
        assert!(cors_layer(&["http://localhost:3000".to_string()]).is_some());
        assert!(cors_layer(&["*".to_string()]).is_some());
    }
}
