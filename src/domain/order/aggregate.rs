//! Order aggregate.

use rust_decimal::Decimal;

use crate::domain::foundation::{OrderId, OwnedByUser, ValidationError};

/// The caller-editable part of an order.
///
/// Create and update payloads carry exactly these fields; they are copied
/// onto the order verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDetails {
    pub amount: Decimal,
    pub product: String,
    pub quantity: i32,
}

impl OrderDetails {
    pub fn new(amount: Decimal, product: impl Into<String>, quantity: i32) -> Self {
        Self {
            amount,
            product: product.into(),
            quantity,
        }
    }
}

/// A purchase order.
///
/// # Invariants
///
/// - `id` is `None` until the store persists the order, then never changes.
/// - `owner` is never blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    id: Option<OrderId>,
    owner: String,
    details: OrderDetails,
}

impl Order {
    /// Creates an order that has not been persisted yet.
    ///
    /// # Errors
    ///
    /// Returns `EmptyField` if `owner` is blank.
    pub fn new(owner: impl Into<String>, details: OrderDetails) -> Result<Self, ValidationError> {
        let owner = validate_owner(owner.into())?;
        Ok(Self {
            id: None,
            owner,
            details,
        })
    }

    /// Rebuilds a persisted order from storage.
    pub fn reconstitute(id: OrderId, owner: impl Into<String>, details: OrderDetails) -> Self {
        Self {
            id: Some(id),
            owner: owner.into(),
            details,
        }
    }

    /// Returns this order carrying the store-assigned id.
    ///
    /// An already persisted order keeps its original id.
    pub fn with_id(mut self, id: OrderId) -> Self {
        if self.id.is_none() {
            self.id = Some(id);
        }
        self
    }

    /// Replaces owner and details, keeping the id.
    ///
    /// # Errors
    ///
    /// Returns `EmptyField` if `owner` is blank; the order is left untouched.
    pub fn overwrite(
        &mut self,
        owner: impl Into<String>,
        details: OrderDetails,
    ) -> Result<(), ValidationError> {
        self.owner = validate_owner(owner.into())?;
        self.details = details;
        Ok(())
    }

    pub fn id(&self) -> Option<OrderId> {
        self.id
    }

    pub fn amount(&self) -> Decimal {
        self.details.amount
    }

    pub fn product(&self) -> &str {
        &self.details.product
    }

    pub fn quantity(&self) -> i32 {
        self.details.quantity
    }

    pub fn details(&self) -> &OrderDetails {
        &self.details
    }
}

impl OwnedByUser for Order {
    fn owner(&self) -> &str {
        &self.owner
    }
}

fn validate_owner(owner: String) -> Result<String, ValidationError> {
    if owner.trim().is_empty() {
        Err(ValidationError::empty_field("owner"))
    } else {
        Ok(owner)
    }
}
