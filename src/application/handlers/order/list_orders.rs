//! ListOrdersHandler - Query handler for paged order listings.
//!
//! Picks one of four repository queries from the caller's scope and the
//! optional product filter.

use std::sync::Arc;

use tracing::debug;

use crate::domain::foundation::Scope;
use crate::domain::order::{Order, OrderError};
use crate::ports::{OrderRepository, Page, PageRequest, Sort, SortDirection, SortField};

/// Query to list orders visible in a scope.
#[derive(Debug, Clone)]
pub struct ListOrdersQuery {
    pub scope: Scope,
    /// Product to match, ignoring case. Blank means no filter.
    pub product_type: Option<String>,
    pub page: PageRequest,
}

/// Handler for order listings.
pub struct ListOrdersHandler {
    repository: Arc<dyn OrderRepository>,
}

impl ListOrdersHandler {
    pub fn new(repository: Arc<dyn OrderRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: ListOrdersQuery) -> Result<Page<Order>, OrderError> {
        let page = query.page.sorted_or(default_sort());
        let product = query
            .product_type
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty());

        debug!(
            scope = %query.scope,
            product = ?product,
            page = page.page(),
            size = page.size(),
            "Listing orders"
        );

        let result = match (&query.scope, product) {
            (Scope::All, None) => self.repository.find_all(&page).await?,
            (Scope::All, Some(product)) => self.repository.find_by_product(product, &page).await?,
            (Scope::OwnedBy(owner), None) => self.repository.find_by_owner(owner, &page).await?,
            (Scope::OwnedBy(owner), Some(product)) => {
                self.repository
                    .find_by_owner_and_product(owner, product, &page)
                    .await?
            }
        };

        Ok(result)
    }
}

/// Listings without an explicit sort are ordered by amount, lowest first.
fn default_sort() -> Sort {
    Sort::by(SortField::Amount, SortDirection::Asc)
}
