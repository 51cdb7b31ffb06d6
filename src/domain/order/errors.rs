//! Order-specific error types.

use crate::domain::foundation::{DomainError, ErrorCode, OrderId, ValidationError};

/// Errors returned by the order handlers.
///
/// There is deliberately no `Forbidden` variant: an order outside the
/// caller's scope is reported as `NotFound`, exactly like an id that does
/// not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    /// Order does not exist within the caller's scope.
    NotFound(OrderId),
    /// Request payload or parameters are invalid.
    ValidationFailed { field: String, message: String },
    /// Store or other infrastructure failure.
    Infrastructure(String),
}

impl OrderError {
    pub fn not_found(id: OrderId) -> Self {
        OrderError::NotFound(id)
    }
    pub fn infrastructure(message: impl Into<String>) -> Self {
        OrderError::Infrastructure(message.into())
    }
    pub fn message(&self) -> String {
        match self {
            OrderError::NotFound(id) => format!("Order not found: {}", id),
            OrderError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            OrderError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for OrderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for OrderError {}

impl From<DomainError> for OrderError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed
            | ErrorCode::EmptyField
            | ErrorCode::OutOfRange
            | ErrorCode::InvalidFormat => OrderError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => OrderError::Infrastructure(err.to_string()),
        }
    }
}

impl From<ValidationError> for OrderError {
    fn from(err: ValidationError) -> Self {
        OrderError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}
