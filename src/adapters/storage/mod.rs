//! Storage Adapters
//!
//! In-process implementations of the `OrderRepository` port, plus demo
//! data seeding shared by every store.
//!
//! ## Available Adapters
//!
//! - **InMemoryOrderRepository** - Stores orders in memory (testing/development)
//!
//! The PostgreSQL implementation lives in `adapters::postgres`.

mod in_memory_order_repository;
mod seed;

pub use in_memory_order_repository::{demo_orders, InMemoryOrderRepository};
pub use seed::seed_if_empty;
