//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives: ids, errors, principal, scope, ownership
//! - `order` - Order aggregate and order-specific errors

pub mod foundation;
pub mod order;
