//! GetOrderHandler - Query handler for a single order.

use std::sync::Arc;

use crate::domain::foundation::{OrderId, Scope};
use crate::domain::order::{Order, OrderError};
use crate::ports::OrderRepository;

use super::OrderAccessGuard;

/// Query to get an order by ID.
#[derive(Debug, Clone)]
pub struct GetOrderQuery {
    pub id: OrderId,
    pub scope: Scope,
}

/// Handler for retrieving one order.
pub struct GetOrderHandler {
    guard: OrderAccessGuard,
}

impl GetOrderHandler {
    pub fn new(repository: Arc<dyn OrderRepository>) -> Self {
        Self {
            guard: OrderAccessGuard::new(repository),
        }
    }

    pub async fn handle(&self, query: GetOrderQuery) -> Result<Order, OrderError> {
        self.guard.find_for_access(query.id, &query.scope).await
    }
}
