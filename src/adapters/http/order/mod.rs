//! HTTP adapter for order endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{ErrorResponse, ListOrdersParams, OrderRequest, OrderResponse};
pub use handlers::OrderHandlers;
pub use routes::order_routes;
