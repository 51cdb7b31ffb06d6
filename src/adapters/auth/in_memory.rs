//! In-memory credential store.
//!
//! Implements the `CredentialVerifier` port from a fixed account table.
//! Passwords are held only as SHA-256 digests and compared in constant time.
//!
//! # Example
//!
//! ```ignore
//! use beorders::adapters::auth::InMemoryCredentialStore;
//! use beorders::domain::foundation::Role;
//! use secrecy::SecretString;
//!
//! let store = InMemoryCredentialStore::new()
//!     .with_user("Alice", SecretString::new("alice".into()), Role::OrderOwner);
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::domain::foundation::{AuthError, Principal, Role};
use crate::ports::CredentialVerifier;

type PasswordDigest = [u8; 32];

#[derive(Debug, Clone)]
struct Account {
    digest: PasswordDigest,
    role: Role,
}

/// Credential store backed by an in-process account table.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    accounts: HashMap<String, Account>,
    /// Optional error to return for all verifications (for error testing)
    force_error: Option<AuthError>,
}

impl InMemoryCredentialStore {
    /// Creates an empty store that rejects everyone.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an account. A later call with the same name replaces it.
    pub fn with_user(mut self, name: impl Into<String>, password: SecretString, role: Role) -> Self {
        self.accounts.insert(
            name.into(),
            Account {
                digest: digest(&password),
                role,
            },
        );
        self
    }

    /// Store holding the demo accounts.
    ///
    /// | name  | password | role            |
    /// |-------|----------|-----------------|
    /// | Admin | admin    | ADMIN           |
    /// | Alice | alice    | ORDER_OWNER     |
    /// | Boris | boris    | NON_ORDER_OWNER |
    /// | Cathy | cathy    | ORDER_OWNER     |
    pub fn with_demo_users() -> Self {
        [
            ("Admin", "admin", Role::Admin),
            ("Alice", "alice", Role::OrderOwner),
            ("Boris", "boris", Role::NonOrderOwner),
            ("Cathy", "cathy", Role::OrderOwner),
        ]
        .into_iter()
        .fold(Self::new(), |store, (name, password, role)| {
            store.with_user(name, SecretString::new(password.to_string()), role)
        })
    }

    /// Forces all verifications to return the specified error.
    pub fn with_error(mut self, error: AuthError) -> Self {
        self.force_error = Some(error);
        self
    }
}

#[async_trait]
impl CredentialVerifier for InMemoryCredentialStore {
    async fn verify(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<Principal, AuthError> {
        if let Some(error) = self.force_error.clone() {
            return Err(error);
        }

        let presented = digest(password);
        // Unknown users still pay for a comparison.
        let (expected, role) = match self.accounts.get(username) {
            Some(account) => (account.digest, Some(account.role)),
            None => ([0u8; 32], None),
        };
        let matches: bool = presented[..].ct_eq(&expected[..]).into();

        match role {
            Some(role) if matches => {
                Principal::new(username, role).map_err(|_| AuthError::InvalidCredentials)
            }
            _ => {
                warn!(user = %username, "Rejected credentials");
                Err(AuthError::InvalidCredentials)
            }
        }
    }
}

fn digest(password: &SecretString) -> PasswordDigest {
    Sha256::digest(password.expose_secret().as_bytes()).into()
}
