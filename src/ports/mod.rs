//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `OrderRepository` - Order persistence with owner-aware lookups and paging
//! - `CredentialVerifier` - Resolves a `Principal` from caller credentials

mod credential_verifier;
mod order_repository;

pub use credential_verifier::CredentialVerifier;
pub use order_repository::{
    OrderRepository, Page, PageRequest, Sort, SortDirection, SortField, SortOrder,
    DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
