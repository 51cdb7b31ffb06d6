//! Demo data seeding for any `OrderRepository`.

use tracing::info;

use crate::domain::foundation::DomainError;
use crate::domain::order::Order;
use crate::ports::{OrderRepository, PageRequest};

/// Saves `orders` only if the store holds no orders yet.
///
/// Returns the number of orders written. A store that already has data is
/// left untouched, so restarts neither revive deleted demo rows nor revert
/// edits made to them.
pub async fn seed_if_empty(
    repository: &dyn OrderRepository,
    orders: Vec<Order>,
) -> Result<usize, DomainError> {
    let existing = repository.find_all(&PageRequest::default()).await?.total;
    if existing > 0 {
        info!(existing, "Order store not empty; skipping demo seed");
        return Ok(0);
    }

    let count = orders.len();
    for order in orders {
        repository.save(order).await?;
    }
    Ok(count)
}
