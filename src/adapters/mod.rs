//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - Credential verification
//! - `http` - axum REST API
//! - `postgres` - PostgreSQL order persistence
//! - `storage` - In-memory order persistence

pub mod auth;
pub mod http;
pub mod postgres;
pub mod storage;

pub use auth::InMemoryCredentialStore;
pub use postgres::PostgresOrderRepository;
pub use storage::InMemoryOrderRepository;
