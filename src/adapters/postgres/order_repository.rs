//! PostgreSQL implementation of OrderRepository.
//!
//! Persists orders to the `be_order` table. Sort keys come from the
//! whitelisted `SortField` enum, so they are safe to splice into
//! `ORDER BY`; every value is bound as a parameter.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{DomainError, ErrorCode, OrderId, OwnedByUser};
use crate::domain::order::{Order, OrderDetails};
use crate::ports::{OrderRepository, Page, PageRequest};

const SELECT_COLUMNS: &str = "SELECT id, amount, owner, product, quantity FROM be_order";

/// PostgreSQL implementation of OrderRepository.
#[derive(Clone)]
pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    /// Creates a new PostgresOrderRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Runs a filtered, sorted, paged listing.
    ///
    /// `filter` is a WHERE fragment using `$1..$n` for the values in `binds`.
    async fn fetch_page(
        &self,
        filter: Option<&str>,
        binds: &[&str],
        page: &PageRequest,
    ) -> Result<Page<Order>, DomainError> {
        let where_clause = filter.map(|f| format!(" WHERE {}", f)).unwrap_or_default();

        let count_sql = format!("SELECT COUNT(*) FROM be_order{}", where_clause);
        let mut count_query = sqlx::query_as::<_, (i64,)>(&count_sql);
        for value in binds {
            count_query = count_query.bind(*value);
        }
        let (total,) = count_query
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to count orders", e))?;

        let list_sql = format!(
            "{}{} ORDER BY {} LIMIT ${} OFFSET ${}",
            SELECT_COLUMNS,
            where_clause,
            order_by_clause(page),
            binds.len() + 1,
            binds.len() + 2
        );
        let mut list_query = sqlx::query(&list_sql);
        for value in binds {
            list_query = list_query.bind(*value);
        }
        let rows = list_query
            .bind(page.size() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list orders", e))?;

        let items = rows
            .into_iter()
            .map(row_to_order)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(items, page, total.max(0) as u64))
    }

    /// Moves the id sequence past any explicitly written id.
    async fn sync_id_sequence(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            SELECT setval(
                pg_get_serial_sequence('be_order', 'id'),
                GREATEST((SELECT MAX(id) FROM be_order), 1)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to sync order id sequence", e))?;

        Ok(())
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, DomainError> {
        let row = sqlx::query(&format!("{} WHERE id = $1", SELECT_COLUMNS))
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to fetch order", e))?;

        row.map(row_to_order).transpose()
    }

    async fn find_by_id_and_owner(
        &self,
        id: OrderId,
        owner: &str,
    ) -> Result<Option<Order>, DomainError> {
        let row = sqlx::query(&format!("{} WHERE id = $1 AND owner = $2", SELECT_COLUMNS))
            .bind(id.as_i64())
            .bind(owner)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to fetch order", e))?;

        row.map(row_to_order).transpose()
    }

    async fn exists_by_id(&self, id: OrderId) -> Result<bool, DomainError> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM be_order WHERE id = $1")
            .bind(id.as_i64())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to check order existence", e))?;

        Ok(result.0 > 0)
    }

    async fn exists_by_id_and_owner(
        &self,
        id: OrderId,
        owner: &str,
    ) -> Result<bool, DomainError> {
        let result: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM be_order WHERE id = $1 AND owner = $2")
                .bind(id.as_i64())
                .bind(owner)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| db_error("Failed to check order existence", e))?;

        Ok(result.0 > 0)
    }

    async fn find_all(&self, page: &PageRequest) -> Result<Page<Order>, DomainError> {
        self.fetch_page(None, &[], page).await
    }

    async fn find_by_owner(
        &self,
        owner: &str,
        page: &PageRequest,
    ) -> Result<Page<Order>, DomainError> {
        self.fetch_page(Some("owner = $1"), &[owner], page).await
    }

    async fn find_by_product(
        &self,
        product: &str,
        page: &PageRequest,
    ) -> Result<Page<Order>, DomainError> {
        self.fetch_page(Some("LOWER(product) = LOWER($1)"), &[product], page)
            .await
    }

    async fn find_by_owner_and_product(
        &self,
        owner: &str,
        product: &str,
        page: &PageRequest,
    ) -> Result<Page<Order>, DomainError> {
        self.fetch_page(
            Some("owner = $1 AND LOWER(product) = LOWER($2)"),
            &[owner, product],
            page,
        )
        .await
    }

    async fn save(&self, order: Order) -> Result<Order, DomainError> {
        match order.id() {
            Some(id) => {
                sqlx::query(
                    r#"
                    INSERT INTO be_order (id, amount, owner, product, quantity)
                    VALUES ($1, $2, $3, $4, $5)
                    ON CONFLICT (id) DO UPDATE SET
                        amount = EXCLUDED.amount,
                        owner = EXCLUDED.owner,
                        product = EXCLUDED.product,
                        quantity = EXCLUDED.quantity
                    "#,
                )
                .bind(id.as_i64())
                .bind(order.amount())
                .bind(order.owner())
                .bind(order.product())
                .bind(order.quantity())
                .execute(&self.pool)
                .await
                .map_err(|e| db_error("Failed to upsert order", e))?;

                self.sync_id_sequence().await?;
                Ok(order)
            }
            None => {
                let (id,): (i64,) = sqlx::query_as(
                    r#"
                    INSERT INTO be_order (amount, owner, product, quantity)
                    VALUES ($1, $2, $3, $4)
                    RETURNING id
                    "#,
                )
                .bind(order.amount())
                .bind(order.owner())
                .bind(order.product())
                .bind(order.quantity())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| db_error("Failed to insert order", e))?;

                Ok(order.with_id(OrderId::new(id)))
            }
        }
    }

    async fn delete_by_id(&self, id: OrderId) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM be_order WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete order", e))?;

        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, e))
}

/// Renders the requested sort keys, always ending with `id` as tie-breaker.
fn order_by_clause(page: &PageRequest) -> String {
    let mut keys: Vec<String> = page
        .sort()
        .map(|sort| {
            sort.orders()
                .iter()
                .map(|o| format!("{} {}", o.field.as_str(), o.direction.as_sql()))
                .collect()
        })
        .unwrap_or_default();
    keys.push("id ASC".to_string());
    keys.join(", ")
}

fn row_to_order(row: PgRow) -> Result<Order, DomainError> {
    let id: i64 = row
        .try_get("id")
        .map_err(|e| db_error("Failed to get id", e))?;
    let amount: Decimal = row
        .try_get("amount")
        .map_err(|e| db_error("Failed to get amount", e))?;
    let owner: String = row
        .try_get("owner")
        .map_err(|e| db_error("Failed to get owner", e))?;
    let product: String = row
        .try_get("product")
        .map_err(|e| db_error("Failed to get product", e))?;
    let quantity: i32 = row
        .try_get("quantity")
        .map_err(|e| db_error("Failed to get quantity", e))?;

    Ok(Order::reconstitute(
        OrderId::new(id),
        owner,
        OrderDetails::new(amount, product, quantity),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::Sort;

    #[test]
    fn order_by_defaults_to_id() {
        assert_eq!(order_by_clause(&PageRequest::default()), "id ASC");
    }

    #[test]
    fn order_by_renders_requested_keys_before_id() {
        let sort = Sort::from_params(["amount,desc", "owner"]).unwrap().unwrap();
        let page = PageRequest::default().with_sort(sort);
        assert_eq!(order_by_clause(&page), "amount DESC, owner ASC, id ASC");
    }

    #[test]
    fn db_error_carries_context() {
        let err = db_error("Failed to fetch order", sqlx::Error::RowNotFound);
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(err.message.starts_with("Failed to fetch order"));
    }
}
