//! Authentication adapters.
//!
//! Implementations of the `CredentialVerifier` port:
//!
//! - `in_memory` - Fixed account table with hashed passwords

mod in_memory;

pub use in_memory::InMemoryCredentialStore;
