//! Credential verification port.
//!
//! Turns a username/password pair into a `Principal`. Implementations own
//! the credential storage format; the rest of the system only ever sees
//! the resulting principal.
//!
//! # Contract
//!
//! Implementations must:
//! - Return `AuthError::InvalidCredentials` for unknown users and wrong
//!   passwords alike, so callers cannot probe for account names
//! - Return `AuthError::ServiceUnavailable` for transient errors

use async_trait::async_trait;
use secrecy::SecretString;

use crate::domain::foundation::{AuthError, Principal};

/// Verifies credentials and resolves the caller's principal.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Verify a username/password pair.
    ///
    /// # Returns
    ///
    /// * `Ok(Principal)` - Credentials are valid
    /// * `Err(AuthError::InvalidCredentials)` - Unknown user or wrong password
    /// * `Err(AuthError::ServiceUnavailable)` - Credential store unreachable
    async fn verify(&self, username: &str, password: &SecretString)
        -> Result<Principal, AuthError>;
}
