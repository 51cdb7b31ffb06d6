//! Visibility scope resolution.
//!
//! Every order request is evaluated inside a `Scope`: either everything in
//! the store, or only the records of a single owner. The scope is computed
//! fresh per request from the caller and the route tree the request came
//! through, and is then the only input the query and mutation code uses to
//! restrict access.
//!
//! ```text
//! (Principal, RouteKind) --resolve_scope--> Scope --> query planner / mutation guard
//! ```
//!
//! Route-level capability (may this role use this route tree at all?) is
//! checked by `RouteKind::permits` before resolution; the resolver itself
//! never fails.

use std::fmt;

use super::{Principal, Role};

/// Which route tree a request arrived through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteKind {
    /// Administrative tree, full visibility.
    Admin,
    /// Public tree, scoped to the caller unless the caller is an admin.
    Public,
}

impl RouteKind {
    /// Path prefix of the route tree.
    pub fn base_path(&self) -> &'static str {
        match self {
            RouteKind::Admin => "/v1/admin/orders",
            RouteKind::Public => "/v1/orders",
        }
    }

    /// Returns true if a principal with `role` may use this route tree.
    ///
    /// The admin tree is reserved to `ADMIN`; the public tree accepts
    /// `ADMIN` and `ORDER_OWNER`.
    pub fn permits(&self, role: Role) -> bool {
        match self {
            RouteKind::Admin => matches!(role, Role::Admin),
            RouteKind::Public => matches!(role, Role::Admin | Role::OrderOwner),
        }
    }
}

impl fmt::Display for RouteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteKind::Admin => f.write_str("admin"),
            RouteKind::Public => f.write_str("public"),
        }
    }
}

/// Visibility restriction applied to one request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Unrestricted.
    All,
    /// Restricted to orders whose owner equals the given name.
    OwnedBy(String),
}

impl Scope {
    /// Filters an owner requested in a write payload through this scope.
    ///
    /// Only an unrestricted caller may name an owner other than itself;
    /// inside `OwnedBy` the request is treated as if no owner was supplied,
    /// so the ownership assigner falls back to the caller or the existing
    /// owner.
    pub fn permitted_owner<'a>(&self, requested: Option<&'a str>) -> Option<&'a str> {
        match self {
            Scope::All => requested,
            Scope::OwnedBy(_) => None,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::All => f.write_str("ALL"),
            Scope::OwnedBy(owner) => write!(f, "OWNED_BY({})", owner),
        }
    }
}

/// Computes the visibility scope of a request.
///
/// The admin tree and the admin role are two independent ways to obtain
/// `Scope::All`; everyone else sees only their own orders.
pub fn resolve_scope(principal: &Principal, route: RouteKind) -> Scope {
    if route == RouteKind::Admin || principal.is_admin() {
        Scope::All
    } else {
        Scope::OwnedBy(principal.name().to_string())
    }
}
