//! UpdateOrderHandler - Command handler for overwriting an order.
//!
//! The target id always comes from the command, never from the payload.
//! Amount, product and quantity are replaced wholesale; the owner follows
//! the ownership rules for updates.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{assign_owner_on_update, OrderId, OwnedByUser, Principal, Scope};
use crate::domain::order::{Order, OrderDetails, OrderError};
use crate::ports::OrderRepository;

use super::access::clamp_requested_owner;
use super::OrderAccessGuard;

/// Command to update an existing order.
#[derive(Debug, Clone)]
pub struct UpdateOrderCommand {
    pub id: OrderId,
    pub scope: Scope,
    pub principal: Principal,
    /// Owner named in the payload, honored only for unrestricted callers.
    pub requested_owner: Option<String>,
    pub details: OrderDetails,
}

/// Handler for updating orders.
pub struct UpdateOrderHandler {
    repository: Arc<dyn OrderRepository>,
    guard: OrderAccessGuard,
}

impl UpdateOrderHandler {
    pub fn new(repository: Arc<dyn OrderRepository>) -> Self {
        Self {
            guard: OrderAccessGuard::new(repository.clone()),
            repository,
        }
    }

    pub async fn handle(&self, cmd: UpdateOrderCommand) -> Result<Order, OrderError> {
        let mut order = self.guard.find_for_access(cmd.id, &cmd.scope).await?;

        let requested =
            clamp_requested_owner(&cmd.scope, cmd.requested_owner.as_deref(), &cmd.principal);
        let owner = assign_owner_on_update(order.owner(), requested, &cmd.principal);

        order.overwrite(owner, cmd.details)?;
        let saved = self.repository.save(order).await?;

        info!(order_id = %cmd.id, owner = %saved.owner(), by = %cmd.principal.name(), "Order updated");
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryOrderRepository;
    use crate::domain::foundation::Role;
    use rust_decimal::Decimal;

    fn principal(name: &str, role: Role) -> Principal {
        Principal::new(name, role).unwrap()
    }

    fn alice_command(id: i64, owner: Option<&str>) -> UpdateOrderCommand {
        UpdateOrderCommand {
            id: OrderId::new(id),
            scope: Scope::OwnedBy("Alice".into()),
            principal: principal("Alice", Role::OrderOwner),
            requested_owner: owner.map(str::to_string),
            details: OrderDetails::new(Decimal::new(1999, 2), "Dogfood", 2),
        }
    }

    fn setup() -> (Arc<InMemoryOrderRepository>, UpdateOrderHandler) {
        let repo = Arc::new(InMemoryOrderRepository::with_demo_orders());
        let handler = UpdateOrderHandler::new(repo.clone());
        (repo, handler)
    }

    #[tokio::test]
    async fn overwrites_details_and_keeps_owner() {
        let (repo, handler) = setup();

        handler.handle(alice_command(99, None)).await.unwrap();

        let stored = repo.find_by_id(OrderId::new(99)).await.unwrap().unwrap();
        assert_eq!(stored.owner(), "Alice");
        assert_eq!(stored.amount(), Decimal::new(1999, 2));
        assert_eq!(stored.quantity(), 2);
    }

    #[tokio::test]
    async fn same_payload_twice_gives_same_state() {
        let (repo, handler) = setup();

        handler.handle(alice_command(99, None)).await.unwrap();
        let first = repo.find_by_id(OrderId::new(99)).await.unwrap();
        handler.handle(alice_command(99, None)).await.unwrap();
        let second = repo.find_by_id(OrderId::new(99)).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(repo.order_count().await, 7);
    }

    #[tokio::test]
    async fn foreign_order_is_not_found_and_untouched() {
        let (repo, handler) = setup();
        let before = repo.find_by_id(OrderId::new(600)).await.unwrap();

        let result = handler.handle(alice_command(600, None)).await;

        assert!(matches!(result, Err(OrderError::NotFound(_))));
        assert_eq!(repo.find_by_id(OrderId::new(600)).await.unwrap(), before);
    }

    #[tokio::test]
    async fn restricted_caller_cannot_hand_order_to_someone_else() {
        let (repo, handler) = setup();

        handler.handle(alice_command(99, Some("Cathy"))).await.unwrap();

        let stored = repo.find_by_id(OrderId::new(99)).await.unwrap().unwrap();
        assert_eq!(stored.owner(), "Alice");
    }

    #[tokio::test]
    async fn unrestricted_caller_may_reassign_owner() {
        let (repo, handler) = setup();

        handler
            .handle(UpdateOrderCommand {
                id: OrderId::new(600),
                scope: Scope::All,
                principal: principal("Admin", Role::Admin),
                requested_owner: Some("Alice".to_string()),
                details: OrderDetails::new(Decimal::new(160099, 2), "Dogfood", 2),
            })
            .await
            .unwrap();

        let stored = repo.find_by_id(OrderId::new(600)).await.unwrap().unwrap();
        assert_eq!(stored.owner(), "Alice");
    }

    #[tokio::test]
    async fn missing_order_is_not_found() {
        let (_, handler) = setup();
        let result = handler.handle(alice_command(12345, None)).await;
        assert_eq!(result, Err(OrderError::not_found(OrderId::new(12345))));
    }
}
