//! Order command and query handlers.
//!
//! Every handler takes the caller's `Scope`; the same handlers serve the
//! admin and the public route trees.

mod access;
mod create_order;
mod delete_order;
mod get_order;
mod list_orders;
mod update_order;

pub use access::OrderAccessGuard;
pub use create_order::{CreateOrderCommand, CreateOrderHandler};
pub use delete_order::{DeleteOrderCommand, DeleteOrderHandler};
pub use get_order::{GetOrderHandler, GetOrderQuery};
pub use list_orders::{ListOrdersHandler, ListOrdersQuery};
pub use update_order::{UpdateOrderCommand, UpdateOrderHandler};
