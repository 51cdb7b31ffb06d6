//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod order;

pub use order::{
    CreateOrderCommand, CreateOrderHandler, DeleteOrderCommand, DeleteOrderHandler,
    GetOrderHandler, GetOrderQuery, ListOrdersHandler, ListOrdersQuery, OrderAccessGuard,
    UpdateOrderCommand, UpdateOrderHandler,
};
