//! CreateOrderHandler - Command handler for placing orders.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{assign_owner_on_create, OwnedByUser, Principal, Scope};
use crate::domain::order::{Order, OrderDetails, OrderError};
use crate::ports::OrderRepository;

use super::access::clamp_requested_owner;

/// Command to create a new order.
#[derive(Debug, Clone)]
pub struct CreateOrderCommand {
    pub scope: Scope,
    pub principal: Principal,
    /// Owner named in the payload, honored only for unrestricted callers.
    pub requested_owner: Option<String>,
    pub details: OrderDetails,
}

/// Handler for creating orders.
pub struct CreateOrderHandler {
    repository: Arc<dyn OrderRepository>,
}

impl CreateOrderHandler {
    pub fn new(repository: Arc<dyn OrderRepository>) -> Self {
        Self { repository }
    }

    /// Stores the order under a fresh id and returns it.
    pub async fn handle(&self, cmd: CreateOrderCommand) -> Result<Order, OrderError> {
        let requested =
            clamp_requested_owner(&cmd.scope, cmd.requested_owner.as_deref(), &cmd.principal);
        let owner = assign_owner_on_create(requested, &cmd.principal);

        let order = Order::new(owner, cmd.details)?;
        let saved = self.repository.save(order).await?;

        if let Some(id) = saved.id() {
            info!(order_id = %id, owner = %saved.owner(), by = %cmd.principal.name(), "Order created");
        }
        Ok(saved)
    }
}
