//! Authentication types for the domain layer.
//!
//! A `Principal` is the caller identity the core works with. It is produced
//! by the `CredentialVerifier` port; the domain never sees raw credentials.
//!
//! # Design Decisions
//!
//! - `Role` is the only authority on admin capability. Names carry no
//!   privileges, so an account called "Admin" with role `ORDER_OWNER` is an
//!   ordinary owner.
//! - `AuthError` is domain-centric, not tied to HTTP Basic or any provider.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::ValidationError;

/// Role granted to an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Administrative privileges, unrestricted visibility.
    Admin,
    /// Non-admin user that has placed orders.
    OrderOwner,
    /// Non-admin user that has not placed orders yet.
    NonOrderOwner,
}

impl Role {
    /// Canonical upper-case name, as used in configuration and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::OrderOwner => "ORDER_OWNER",
            Role::NonOrderOwner => "NON_ORDER_OWNER",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "ORDER_OWNER" => Ok(Role::OrderOwner),
            "NON_ORDER_OWNER" => Ok(Role::NonOrderOwner),
            other => Err(ValidationError::invalid_format(
                "role",
                format!("unknown role '{}'", other),
            )),
        }
    }
}

/// Authenticated caller for the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    name: String,
    role: Role,
}

impl Principal {
    /// Creates a principal.
    ///
    /// # Errors
    ///
    /// Returns `EmptyField` if the name is blank; a blank name could never
    /// be used as an owner.
    pub fn new(name: impl Into<String>, role: Role) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        Ok(Self { name, role })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Authentication errors that can occur while resolving a principal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No credentials were presented.
    #[error("Missing credentials")]
    MissingCredentials,

    /// Credentials were malformed, the user is unknown, or the password is wrong.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The credential store is unavailable.
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn principal_new_keeps_name_and_role() {
        let principal = Principal::new("Alice", Role::OrderOwner).unwrap();
        assert_eq!(principal.name(), "Alice");
        assert_eq!(principal.role(), Role::OrderOwner);
        assert!(!principal.is_admin());
    }

    #[test]
    fn principal_rejects_blank_name() {
        let err = Principal::new("  ", Role::Admin).unwrap_err();
        assert_eq!(err, ValidationError::empty_field("name"));
    }

    #[test]
    fn admin_capability_comes_from_role_not_name() {
        let impostor = Principal::new("Admin", Role::OrderOwner).unwrap();
        let admin = Principal::new("root", Role::Admin).unwrap();

        assert!(!impostor.is_admin());
        assert!(admin.is_admin());
    }

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("Order_Owner".parse::<Role>().unwrap(), Role::OrderOwner);
        assert_eq!("NON_ORDER_OWNER".parse::<Role>().unwrap(), Role::NonOrderOwner);
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn role_serializes_screaming_snake_case() {
        let json = serde_json::to_string(&Role::NonOrderOwner).unwrap();
        assert_eq!(json, "\"NON_ORDER_OWNER\"");
    }

    #[test]
    fn auth_error_service_unavailable_displays_message() {
        let err = AuthError::service_unavailable("Connection refused");
        assert_eq!(format!("{}", err), "Auth service unavailable: Connection refused");
    }
}
