//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, errors, and the authorization
//! vocabulary (principal, role, scope, ownership) of the order domain.

mod auth;
mod authorization;
mod errors;
mod ids;
mod ownership;

pub use auth::{AuthError, Principal, Role};
pub use authorization::{resolve_scope, RouteKind, Scope};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::OrderId;
pub use ownership::{assign_owner_on_create, assign_owner_on_update, OwnedByUser};
