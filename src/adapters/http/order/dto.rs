//! HTTP DTOs for order endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{OrderId, OwnedByUser, ValidationError};
use crate::domain::order::{Order, OrderDetails};
use crate::ports::{PageRequest, Sort, DEFAULT_PAGE_SIZE};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Body of create and update requests.
///
/// An `id` in the payload is ignored; updates take the id from the path.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderRequest {
    pub amount: Decimal,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub product: String,
    #[serde(default)]
    pub quantity: i32,
}

impl OrderRequest {
    /// Splits the payload into the requested owner and the order details.
    pub fn into_parts(self) -> (Option<String>, OrderDetails) {
        (
            self.owner,
            OrderDetails::new(self.amount, self.product, self.quantity),
        )
    }
}

/// Query parameters for listing orders.
///
/// Built from raw pairs because `sort` may repeat:
/// `?productType=Ring&page=0&size=20&sort=amount,desc&sort=id`.
#[derive(Debug, Clone, Default)]
pub struct ListOrdersParams {
    pub product_type: Option<String>,
    pub page: PageRequest,
}

impl ListOrdersParams {
    /// Parses the query pairs.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` for a non-numeric page or size, a size
    /// outside `1..=MAX_PAGE_SIZE`, or an unknown sort property or direction.
    pub fn from_pairs(pairs: &[(String, String)]) -> Result<Self, ValidationError> {
        let mut product_type = None;
        let mut page = 0u32;
        let mut size = DEFAULT_PAGE_SIZE;
        let mut sorts = Vec::new();

        for (key, value) in pairs {
            match key.as_str() {
                "productType" => product_type = Some(value.clone()),
                "page" => page = parse_number("page", value)?,
                "size" => size = parse_number("size", value)?,
                "sort" => sorts.push(value.as_str()),
                _ => {}
            }
        }

        let mut request = PageRequest::new(page, size)?;
        if let Some(sort) = Sort::from_params(sorts)? {
            request = request.with_sort(sort);
        }

        Ok(Self {
            product_type,
            page: request,
        })
    }
}

fn parse_number(field: &str, value: &str) -> Result<u32, ValidationError> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| ValidationError::invalid_format(field, format!("'{}' is not a non-negative integer", value)))
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Order as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderResponse {
    pub id: Option<OrderId>,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub owner: String,
    pub product: String,
    pub quantity: i32,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id(),
            amount: order.amount(),
            owner: order.owner().to_string(),
            product: order.product().to_string(),
            quantity: order.quantity(),
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    pub fn not_found(resource_type: &str, id: &str) -> Self {
        Self::new("NOT_FOUND", format!("{} not found: {}", resource_type, id))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{SortDirection, SortField, MAX_PAGE_SIZE};

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn order_request_deserializes_with_defaults() {
        let json = r#"{"amount": 19.5}"#;
        let req: OrderRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.amount, Decimal::new(195, 1));
        assert!(req.owner.is_none());
        assert_eq!(req.product, "");
        assert_eq!(req.quantity, 0);
    }

    #[test]
    fn order_request_ignores_payload_id() {
        let json = r#"{"id": 5, "amount": 1.00, "owner": "Alice", "product": "Ring", "quantity": 1}"#;
        let req: OrderRequest = serde_json::from_str(json).unwrap();
        let (owner, details) = req.into_parts();
        assert_eq!(owner.as_deref(), Some("Alice"));
        assert_eq!(details.product, "Ring");
    }

    #[test]
    fn order_response_renders_amount_as_number() {
        let order = Order::reconstitute(
            OrderId::new(99),
            "Alice",
            OrderDetails::new(Decimal::new(12399, 2), "Dogfood", 1),
        );

        let json = serde_json::to_value(OrderResponse::from(order)).unwrap();

        assert_eq!(json["id"], 99);
        assert_eq!(json["amount"], serde_json::json!(123.99));
        assert_eq!(json["owner"], "Alice");
        assert_eq!(json["product"], "Dogfood");
        assert_eq!(json["quantity"], 1);
    }

    #[test]
    fn list_params_default_to_first_page() {
        let params = ListOrdersParams::from_pairs(&[]).unwrap();
        assert_eq!(params.page.page(), 0);
        assert_eq!(params.page.size(), DEFAULT_PAGE_SIZE);
        assert!(params.page.sort().is_none());
        assert!(params.product_type.is_none());
    }

    #[test]
    fn list_params_collect_repeated_sorts() {
        let params = ListOrdersParams::from_pairs(&pairs(&[
            ("productType", "Ring"),
            ("page", "2"),
            ("size", "5"),
            ("sort", "amount,desc"),
            ("sort", "id"),
        ]))
        .unwrap();

        assert_eq!(params.product_type.as_deref(), Some("Ring"));
        assert_eq!(params.page.offset(), 10);
        let sort = params.page.sort().unwrap();
        assert_eq!(sort.orders()[0].field, SortField::Amount);
        assert_eq!(sort.orders()[0].direction, SortDirection::Desc);
        assert_eq!(sort.orders()[1].field, SortField::Id);
    }

    #[test]
    fn list_params_reject_bad_numbers_and_sizes() {
        assert!(ListOrdersParams::from_pairs(&pairs(&[("page", "-1")])).is_err());
        assert!(ListOrdersParams::from_pairs(&pairs(&[("size", "abc")])).is_err());
        let too_big = (MAX_PAGE_SIZE + 1).to_string();
        assert!(ListOrdersParams::from_pairs(&pairs(&[("size", too_big.as_str())])).is_err());
    }

    #[test]
    fn list_params_reject_unknown_sort_property() {
        let err = ListOrdersParams::from_pairs(&pairs(&[("sort", "colour")])).unwrap_err();
        assert_eq!(err.field(), "sort");
    }

    #[test]
    fn error_response_not_found_creates_correctly() {
        let error = ErrorResponse::not_found("Order", "600");
        assert_eq!(error.code, "NOT_FOUND");
        assert_eq!(error.message, "Order not found: 600");
    }
}
