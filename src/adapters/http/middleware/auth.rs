//! Authentication middleware and extractors for axum.
//!
//! This module provides:
//! - `auth_middleware` - Layer that verifies HTTP Basic credentials, applies
//!   the route gate and injects the `Principal` into extensions
//! - `RequireAuth` - Extractor that reads the injected principal
//!
//! # Architecture
//!
//! The middleware uses the `CredentialVerifier` port, keeping it
//! storage-agnostic. Each route tree gets its own layer carrying its
//! `RouteKind`, so the gate knows which roles may pass.
//!
//! ```text
//! Request → auth_middleware (verify + gate) → injects Principal into extensions
//!                                                   ↓
//!                                   Handler → RequireAuth extractor reads from extensions
//! ```
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, routing::get, middleware};
//!
//! let state = AuthState::new(verifier, "beorders", RouteKind::Public);
//!
//! let app = Router::new()
//!     .route("/v1/orders", get(list_handler))
//!     .layer(middleware::from_fn_with_state(state, auth_middleware));
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use secrecy::SecretString;

use crate::domain::foundation::{AuthError, Principal, RouteKind};
use crate::ports::CredentialVerifier;

use crate::adapters::http::order::ErrorResponse;

/// Auth middleware state for one route tree.
#[derive(Clone)]
pub struct AuthState {
    pub verifier: Arc<dyn CredentialVerifier>,
    pub realm: Arc<str>,
    pub route: RouteKind,
}

impl AuthState {
    pub fn new(
        verifier: Arc<dyn CredentialVerifier>,
        realm: impl Into<Arc<str>>,
        route: RouteKind,
    ) -> Self {
        Self {
            verifier,
            realm: realm.into(),
            route,
        }
    }

    /// Same verifier and realm, gating a different route tree.
    pub fn for_route(&self, route: RouteKind) -> Self {
        Self {
            route,
            ..self.clone()
        }
    }
}

/// Authentication middleware for HTTP Basic credentials.
///
/// This middleware:
/// 1. Extracts `username:password` from the `Authorization: Basic` header
/// 2. Verifies them using the `CredentialVerifier` port
/// 3. Rejects roles the route tree does not admit with 403
/// 4. On success, injects the `Principal` into request extensions
///
/// Missing or invalid credentials yield 401 with a `WWW-Authenticate`
/// challenge.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let credentials = match basic_credentials(request.headers()) {
        Ok(credentials) => credentials,
        Err(e) => return AuthRejection::from_error(e, &state.realm).into_response(),
    };

    let principal = match state.verifier.verify(&credentials.0, &credentials.1).await {
        Ok(principal) => principal,
        Err(e) => return AuthRejection::from_error(e, &state.realm).into_response(),
    };

    if !state.route.permits(principal.role()) {
        tracing::warn!(
            user = %principal.name(),
            role = %principal.role(),
            route = %state.route,
            "Role not admitted to route tree"
        );
        return AuthRejection::Forbidden.into_response();
    }

    request.extensions_mut().insert(principal);
    next.run(request).await
}

/// Parses the `Authorization: Basic` header.
fn basic_credentials(headers: &HeaderMap) -> Result<(String, SecretString), AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthError::InvalidCredentials)?;

    let (scheme, encoded) = value
        .split_once(' ')
        .ok_or(AuthError::InvalidCredentials)?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return Err(AuthError::InvalidCredentials);
    }

    let decoded = STANDARD
        .decode(encoded.trim())
        .map_err(|_| AuthError::InvalidCredentials)?;
    let decoded = String::from_utf8(decoded).map_err(|_| AuthError::InvalidCredentials)?;

    let (username, password) = decoded
        .split_once(':')
        .ok_or(AuthError::InvalidCredentials)?;

    Ok((username.to_string(), SecretString::new(password.to_string())))
}

/// Extractor that requires an authenticated principal.
///
/// Only usable behind `auth_middleware`; without it every request is
/// rejected with 401.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub Principal);

impl<S> axum::extract::FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            parts
                .extensions
                .get::<Principal>()
                .cloned()
                .map(RequireAuth)
                .ok_or(AuthRejection::Unauthenticated { realm: None })
        })
    }
}

/// Rejection type for authentication failures.
#[derive(Debug, Clone)]
pub enum AuthRejection {
    /// No valid credentials were provided.
    Unauthenticated { realm: Option<Arc<str>> },
    /// Credentials are valid but the role may not use this route tree.
    Forbidden,
    /// The credential store could not be reached.
    Unavailable,
}

impl AuthRejection {
    fn from_error(error: AuthError, realm: &Arc<str>) -> Self {
        match error {
            AuthError::MissingCredentials | AuthError::InvalidCredentials => {
                AuthRejection::Unauthenticated {
                    realm: Some(realm.clone()),
                }
            }
            AuthError::ServiceUnavailable(msg) => {
                tracing::error!("Credential store unavailable: {}", msg);
                AuthRejection::Unavailable
            }
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            AuthRejection::Unauthenticated { realm } => {
                let mut response = (
                    StatusCode::UNAUTHORIZED,
                    Json(ErrorResponse::new("UNAUTHORIZED", "Authentication required")),
                )
                    .into_response();
                let challenge = format!("Basic realm=\"{}\"", realm.as_deref().unwrap_or("beorders"));
                if let Ok(value) = HeaderValue::from_str(&challenge) {
                    response
                        .headers_mut()
                        .insert(header::WWW_AUTHENTICATE, value);
                }
                response
            }
            AuthRejection::Forbidden => (
                StatusCode::FORBIDDEN,
                Json(ErrorResponse::new("FORBIDDEN", "Access denied")),
            )
                .into_response(),
            AuthRejection::Unavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse::new(
                    "SERVICE_UNAVAILABLE",
                    "Authentication service unavailable",
                )),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::InMemoryCredentialStore;
    use axum::{body::Body, middleware, routing::get, Router};
    use secrecy::ExposeSecret;
    use tower::ServiceExt;

    fn basic(user: &str, password: &str) -> String {
        format!("Basic {}", STANDARD.encode(format!("{}:{}", user, password)))
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    async fn whoami(RequireAuth(principal): RequireAuth) -> String {
        principal.name().to_string()
    }

    fn app(route: RouteKind) -> Router {
        let state = AuthState::new(
            Arc::new(InMemoryCredentialStore::with_demo_users()),
            "orders",
            route,
        );
        Router::new()
            .route("/whoami", get(whoami))
            .layer(middleware::from_fn_with_state(state, auth_middleware))
    }

    async fn call(route: RouteKind, auth: Option<String>) -> Response {
        let mut builder = Request::builder().uri("/whoami");
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        app(route)
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Header parsing
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn parses_basic_credentials() {
        let (user, password) = basic_credentials(&headers_with(&basic("Alice", "alice"))).unwrap();
        assert_eq!(user, "Alice");
        assert_eq!(password.expose_secret(), "alice");
    }

    #[test]
    fn password_may_contain_colons() {
        let (_, password) = basic_credentials(&headers_with(&basic("Alice", "a:b:c"))).unwrap();
        assert_eq!(password.expose_secret(), "a:b:c");
    }

    #[test]
    fn missing_header_is_missing_credentials() {
        let result = basic_credentials(&HeaderMap::new());
        assert!(matches!(result, Err(AuthError::MissingCredentials)));
    }

    #[test]
    fn bearer_scheme_is_rejected() {
        let result = basic_credentials(&headers_with("Bearer abc"));
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[test]
    fn undecodable_payload_is_rejected() {
        let result = basic_credentials(&headers_with("Basic !!!notbase64"));
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Middleware
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn missing_credentials_get_challenge() {
        let response = call(RouteKind::Public, None).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Basic realm=\"orders\""
        );
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let response = call(RouteKind::Public, Some(basic("Alice", "BAD_PASSWORD"))).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn order_owner_passes_public_gate() {
        let response = call(RouteKind::Public, Some(basic("Alice", "alice"))).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn non_order_owner_is_forbidden_on_public_tree() {
        let response = call(RouteKind::Public, Some(basic("Boris", "boris"))).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn order_owner_is_forbidden_on_admin_tree() {
        let response = call(RouteKind::Admin, Some(basic("Alice", "alice"))).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn admin_passes_both_gates() {
        assert_eq!(
            call(RouteKind::Admin, Some(basic("Admin", "admin"))).await.status(),
            StatusCode::OK
        );
        assert_eq!(
            call(RouteKind::Public, Some(basic("Admin", "admin"))).await.status(),
            StatusCode::OK
        );
    }

    #[tokio::test]
    async fn unavailable_store_is_503() {
        let state = AuthState::new(
            Arc::new(
                InMemoryCredentialStore::with_demo_users()
                    .with_error(AuthError::service_unavailable("offline")),
            ),
            "orders",
            RouteKind::Public,
        );
        let app = Router::new()
            .route("/whoami", get(whoami))
            .layer(middleware::from_fn_with_state(state, auth_middleware));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/whoami")
                    .header(header::AUTHORIZATION, basic("Alice", "alice"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn require_auth_without_middleware_is_unauthorized() {
        let app = Router::new().route("/whoami", get(whoami));

        let response = app
            .oneshot(Request::builder().uri("/whoami").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
