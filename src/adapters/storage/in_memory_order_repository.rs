//! In-Memory Order Repository Adapter
//!
//! Keeps orders in a `BTreeMap` behind a tokio `RwLock`.
//! Used for development, demos, and tests.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, OrderId, OwnedByUser};
use crate::domain::order::{Order, OrderDetails};
use crate::ports::{OrderRepository, Page, PageRequest, SortDirection, SortField};

#[derive(Debug)]
struct Inner {
    orders: BTreeMap<OrderId, Order>,
    next_id: i64,
}

/// In-memory order store.
#[derive(Debug, Clone)]
pub struct InMemoryOrderRepository {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryOrderRepository {
    /// Create an empty store. The first generated id is 1.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                orders: BTreeMap::new(),
                next_id: 1,
            })),
        }
    }

    /// Create a store holding `orders`.
    ///
    /// Orders without an id are skipped. Generated ids continue after the
    /// highest seeded id.
    pub fn with_orders(orders: impl IntoIterator<Item = Order>) -> Self {
        let orders: BTreeMap<OrderId, Order> = orders
            .into_iter()
            .filter_map(|o| o.id().map(|id| (id, o)))
            .collect();
        let next_id = orders.keys().next_back().map_or(1, |id| id.as_i64() + 1);
        Self {
            inner: Arc::new(RwLock::new(Inner { orders, next_id })),
        }
    }

    /// Create a store seeded with the demo data set.
    pub fn with_demo_orders() -> Self {
        Self::with_orders(demo_orders())
    }

    /// Get the number of stored orders
    pub async fn order_count(&self) -> usize {
        self.inner.read().await.orders.len()
    }

    async fn query<F>(&self, page: &PageRequest, keep: F) -> Page<Order>
    where
        F: Fn(&Order) -> bool,
    {
        let inner = self.inner.read().await;
        let mut matching: Vec<Order> = inner.orders.values().filter(|o| keep(o)).cloned().collect();
        drop(inner);

        sort_orders(&mut matching, page);

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.size() as usize)
            .collect();
        Page::new(items, page, total)
    }
}

impl Default for InMemoryOrderRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, DomainError> {
        Ok(self.inner.read().await.orders.get(&id).cloned())
    }

    async fn find_by_id_and_owner(
        &self,
        id: OrderId,
        owner: &str,
    ) -> Result<Option<Order>, DomainError> {
        Ok(self
            .inner
            .read()
            .await
            .orders
            .get(&id)
            .filter(|o| o.is_owner(owner))
            .cloned())
    }

    async fn exists_by_id(&self, id: OrderId) -> Result<bool, DomainError> {
        Ok(self.inner.read().await.orders.contains_key(&id))
    }

    async fn exists_by_id_and_owner(
        &self,
        id: OrderId,
        owner: &str,
    ) -> Result<bool, DomainError> {
        Ok(self
            .inner
            .read()
            .await
            .orders
            .get(&id)
            .is_some_and(|o| o.is_owner(owner)))
    }

    async fn find_all(&self, page: &PageRequest) -> Result<Page<Order>, DomainError> {
        Ok(self.query(page, |_| true).await)
    }

    async fn find_by_owner(
        &self,
        owner: &str,
        page: &PageRequest,
    ) -> Result<Page<Order>, DomainError> {
        Ok(self.query(page, |o| o.is_owner(owner)).await)
    }

    async fn find_by_product(
        &self,
        product: &str,
        page: &PageRequest,
    ) -> Result<Page<Order>, DomainError> {
        Ok(self
            .query(page, |o| o.product().to_lowercase() == product.to_lowercase())
            .await)
    }

    async fn find_by_owner_and_product(
        &self,
        owner: &str,
        product: &str,
        page: &PageRequest,
    ) -> Result<Page<Order>, DomainError> {
        Ok(self
            .query(page, |o| {
                o.is_owner(owner) && o.product().to_lowercase() == product.to_lowercase()
            })
            .await)
    }

    async fn save(&self, order: Order) -> Result<Order, DomainError> {
        let mut inner = self.inner.write().await;
        let order = match order.id() {
            Some(id) => {
                inner.next_id = inner.next_id.max(id.as_i64() + 1);
                order
            }
            None => {
                let id = OrderId::new(inner.next_id);
                inner.next_id += 1;
                order.with_id(id)
            }
        };
        if let Some(id) = order.id() {
            inner.orders.insert(id, order.clone());
        }
        Ok(order)
    }

    async fn delete_by_id(&self, id: OrderId) -> Result<(), DomainError> {
        self.inner.write().await.orders.remove(&id);
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

fn compare_by(field: SortField, a: &Order, b: &Order) -> Ordering {
    match field {
        SortField::Id => a.id().cmp(&b.id()),
        SortField::Amount => a.amount().cmp(&b.amount()),
        SortField::Owner => a.owner().cmp(b.owner()),
        SortField::Product => a.product().cmp(b.product()),
        SortField::Quantity => a.quantity().cmp(&b.quantity()),
    }
}

/// Sorts by the requested keys, then by id so pages are stable.
fn sort_orders(orders: &mut [Order], page: &PageRequest) {
    orders.sort_by(|a, b| {
        let keyed = page.sort().map_or(Ordering::Equal, |sort| {
            sort.orders().iter().fold(Ordering::Equal, |acc, key| {
                acc.then_with(|| {
                    let ord = compare_by(key.field, a, b);
                    match key.direction {
                        SortDirection::Asc => ord,
                        SortDirection::Desc => ord.reverse(),
                    }
                })
            })
        });
        keyed.then_with(|| a.id().cmp(&b.id()))
    });
}

/// Demo data set: five orders for Alice, one for Cathy, one for Admin.
pub fn demo_orders() -> Vec<Order> {
    let rows: [(i64, &str, &str, &str, i32); 7] = [
        (99, "123.99", "Alice", "Dogfood", 1),
        (100, "1100.99", "Alice", "Ring", 1),
        (200, "1200.99", "Alice", "Bicycle", 1),
        (300, "1300.99", "Alice", "Dogfood", 3),
        (400, "1400.99", "Alice", "Laptop", 1),
        (600, "1600.99", "Cathy", "Dogfood", 2),
        (1000, "1968.05", "Admin", "Ring", 1),
    ];
    rows.iter()
        .map(|(id, amount, owner, product, quantity)| {
            let amount = amount.parse::<Decimal>().unwrap_or_default();
            Order::reconstitute(
                OrderId::new(*id),
                *owner,
                OrderDetails::new(amount, *product, *quantity),
            )
        })
        .collect()
}
