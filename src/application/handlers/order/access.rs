//! OrderAccessGuard - scope-checked lookups shared by the mutating handlers.
//!
//! An order outside the caller's scope is reported exactly like an order
//! that does not exist.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::foundation::{OrderId, Principal, Scope};
use crate::domain::order::{Order, OrderError};
use crate::ports::OrderRepository;

/// Resolves orders through the caller's scope.
pub struct OrderAccessGuard {
    repository: Arc<dyn OrderRepository>,
}

impl OrderAccessGuard {
    pub fn new(repository: Arc<dyn OrderRepository>) -> Self {
        Self { repository }
    }

    /// Loads `id` if it is visible in `scope`.
    pub async fn find_for_access(&self, id: OrderId, scope: &Scope) -> Result<Order, OrderError> {
        let found = match scope {
            Scope::All => self.repository.find_by_id(id).await?,
            Scope::OwnedBy(owner) => self.repository.find_by_id_and_owner(id, owner).await?,
        };

        found.ok_or_else(|| {
            debug!(order_id = %id, scope = %scope, "Order not found in scope");
            OrderError::not_found(id)
        })
    }

    /// Succeeds if `id` exists and is visible in `scope`.
    pub async fn authorize_delete(&self, id: OrderId, scope: &Scope) -> Result<(), OrderError> {
        let exists = match scope {
            Scope::All => self.repository.exists_by_id(id).await?,
            Scope::OwnedBy(owner) => self.repository.exists_by_id_and_owner(id, owner).await?,
        };

        if exists {
            Ok(())
        } else {
            debug!(order_id = %id, scope = %scope, "Delete target not found in scope");
            Err(OrderError::not_found(id))
        }
    }
}

/// Filters a requested owner through `scope`, logging discarded foreign owners.
pub(super) fn clamp_requested_owner<'a>(
    scope: &Scope,
    requested: Option<&'a str>,
    principal: &Principal,
) -> Option<&'a str> {
    let permitted = scope.permitted_owner(requested);
    if let Some(foreign) = requested
        .map(str::trim)
        .filter(|o| !o.is_empty() && *o != principal.name())
        .filter(|_| permitted.is_none())
    {
        warn!(
            user = %principal.name(),
            requested_owner = %foreign,
            "Ignoring owner outside caller scope"
        );
    }
    permitted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryOrderRepository;
    use crate::domain::foundation::{DomainError, Role};
    use crate::domain::order::OrderDetails;
    use crate::ports::{Page, PageRequest};
    use async_trait::async_trait;
    use rust_decimal::Decimal;

    struct FailingOrderRepository;

    #[async_trait]
    impl OrderRepository for FailingOrderRepository {
        async fn find_by_id(&self, _id: OrderId) -> Result<Option<Order>, DomainError> {
            Err(DomainError::database("connection refused"))
        }
        async fn find_by_id_and_owner(
            &self,
            _id: OrderId,
            _owner: &str,
        ) -> Result<Option<Order>, DomainError> {
            Err(DomainError::database("connection refused"))
        }
        async fn exists_by_id(&self, _id: OrderId) -> Result<bool, DomainError> {
            Err(DomainError::database("connection refused"))
        }
        async fn exists_by_id_and_owner(
            &self,
            _id: OrderId,
            _owner: &str,
        ) -> Result<bool, DomainError> {
            Err(DomainError::database("connection refused"))
        }
        async fn find_all(&self, _page: &PageRequest) -> Result<Page<Order>, DomainError> {
            Err(DomainError::database("connection refused"))
        }
        async fn find_by_owner(
            &self,
            _owner: &str,
            _page: &PageRequest,
        ) -> Result<Page<Order>, DomainError> {
            Err(DomainError::database("connection refused"))
        }
        async fn find_by_product(
            &self,
            _product: &str,
            _page: &PageRequest,
        ) -> Result<Page<Order>, DomainError> {
            Err(DomainError::database("connection refused"))
        }
        async fn find_by_owner_and_product(
            &self,
            _owner: &str,
            _product: &str,
            _page: &PageRequest,
        ) -> Result<Page<Order>, DomainError> {
            Err(DomainError::database("connection refused"))
        }
        async fn save(&self, _order: Order) -> Result<Order, DomainError> {
            Err(DomainError::database("connection refused"))
        }
        async fn delete_by_id(&self, _id: OrderId) -> Result<(), DomainError> {
            Err(DomainError::database("connection refused"))
        }
    }

    fn guard() -> OrderAccessGuard {
        let repo = InMemoryOrderRepository::with_orders(vec![
            Order::reconstitute(
                OrderId::new(99),
                "Alice",
                OrderDetails::new(Decimal::new(12399, 2), "Dogfood", 1),
            ),
            Order::reconstitute(
                OrderId::new(600),
                "Cathy",
                OrderDetails::new(Decimal::new(160099, 2), "Dogfood", 2),
            ),
        ]);
        OrderAccessGuard::new(Arc::new(repo))
    }

    fn alice_scope() -> Scope {
        Scope::OwnedBy("Alice".to_string())
    }

    #[tokio::test]
    async fn owner_finds_own_order() {
        let order = guard()
            .find_for_access(OrderId::new(99), &alice_scope())
            .await
            .unwrap();
        assert_eq!(order.id(), Some(OrderId::new(99)));
    }

    #[tokio::test]
    async fn foreign_order_looks_absent() {
        let foreign = guard()
            .find_for_access(OrderId::new(600), &alice_scope())
            .await;
        let missing = guard()
            .find_for_access(OrderId::new(12345), &alice_scope())
            .await;

        assert_eq!(foreign, Err(OrderError::not_found(OrderId::new(600))));
        assert_eq!(missing, Err(OrderError::not_found(OrderId::new(12345))));
    }

    #[tokio::test]
    async fn unrestricted_scope_sees_every_order() {
        let order = guard()
            .find_for_access(OrderId::new(600), &Scope::All)
            .await
            .unwrap();
        assert_eq!(order.id(), Some(OrderId::new(600)));
    }

    #[tokio::test]
    async fn authorize_delete_follows_scope() {
        let guard = guard();
        assert!(guard.authorize_delete(OrderId::new(99), &alice_scope()).await.is_ok());
        assert!(matches!(
            guard.authorize_delete(OrderId::new(600), &alice_scope()).await,
            Err(OrderError::NotFound(_))
        ));
        assert!(guard.authorize_delete(OrderId::new(600), &Scope::All).await.is_ok());
    }

    #[tokio::test]
    async fn store_failure_surfaces_as_infrastructure() {
        let guard = OrderAccessGuard::new(Arc::new(FailingOrderRepository));
        let result = guard.find_for_access(OrderId::new(99), &Scope::All).await;
        assert!(matches!(result, Err(OrderError::Infrastructure(_))));
    }

    #[test]
    fn clamp_keeps_owner_for_unrestricted_scope() {
        let admin = Principal::new("Admin", Role::Admin).unwrap();
        assert_eq!(
            clamp_requested_owner(&Scope::All, Some("Cathy"), &admin),
            Some("Cathy")
        );
    }

    #[test]
    fn clamp_discards_owner_for_restricted_scope() {
        let alice = Principal::new("Alice", Role::OrderOwner).unwrap();
        assert_eq!(clamp_requested_owner(&alice_scope(), Some("Cathy"), &alice), None);
        assert_eq!(clamp_requested_owner(&alice_scope(), Some("Alice"), &alice), None);
    }
}
