//! HTTP routes for order endpoints.

use axum::{routing::get, Router};

use super::handlers::{
    create_order, delete_order, get_order, list_orders, update_order, OrderHandlers,
};

/// Creates the order router mounted at the handlers' route tree base path.
pub fn order_routes(handlers: OrderHandlers) -> Router {
    let base = handlers.route().base_path();
    Router::new()
        .route(base, get(list_orders).post(create_order))
        .route(
            &format!("{}/:id", base),
            get(get_order).put(update_order).delete(delete_order),
        )
        .with_state(handlers)
}
