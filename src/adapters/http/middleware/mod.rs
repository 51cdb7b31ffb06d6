//! HTTP middleware for axum.
//!
//! This module contains middleware layers for cross-cutting concerns:
//!
//! - `auth` - Basic authentication, route gate and extractors

pub mod auth;

pub use auth::{auth_middleware, AuthRejection, AuthState, RequireAuth};
