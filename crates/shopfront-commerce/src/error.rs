//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in storefront domain operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommerceError {
    /// Product cannot be ordered because it is out of stock.
    #[error("Product is sold out: {0}")]
    SoldOut(String),

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Quantity exceeds maximum allowed.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(i64, i64),

    /// Order has no lines.
    #[error("Order has no products")]
    EmptyOrder,

    /// A required customer field is blank.
    #[error("Missing customer field: {0}")]
    MissingField(&'static str),

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// A price string could not be parsed.
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    ValidationError(String),
}
