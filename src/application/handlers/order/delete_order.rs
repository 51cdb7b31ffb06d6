//! DeleteOrderHandler - Command handler for removing an order.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{OrderId, Scope};
use crate::domain::order::OrderError;
use crate::ports::OrderRepository;

use super::OrderAccessGuard;

/// Command to delete an order.
#[derive(Debug, Clone)]
pub struct DeleteOrderCommand {
    pub id: OrderId,
    pub scope: Scope,
}

/// Handler for deleting orders.
pub struct DeleteOrderHandler {
    repository: Arc<dyn OrderRepository>,
    guard: OrderAccessGuard,
}

impl DeleteOrderHandler {
    pub fn new(repository: Arc<dyn OrderRepository>) -> Self {
        Self {
            guard: OrderAccessGuard::new(repository.clone()),
            repository,
        }
    }

    pub async fn handle(&self, cmd: DeleteOrderCommand) -> Result<(), OrderError> {
        self.guard.authorize_delete(cmd.id, &cmd.scope).await?;
        self.repository.delete_by_id(cmd.id).await?;

        info!(order_id = %cmd.id, scope = %cmd.scope, "Order deleted");
        Ok(())
    }
}
