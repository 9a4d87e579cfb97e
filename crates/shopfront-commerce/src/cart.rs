//! Session cart types.
//!
//! The cart lives on the backend, keyed by the session cookie. These are the
//! shapes it returns and the payloads it accepts.

use crate::catalog::Product;
use crate::error::CommerceError;
use crate::ids::{CartId, CartItemId, ProductId};
use crate::money::{Currency, Money};
use crate::wire;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum quantity allowed per cart line or order line.
pub const MAX_QUANTITY_PER_ITEM: i64 = 99;

/// Validate a line quantity.
pub fn validate_quantity(quantity: i64) -> Result<i64, CommerceError> {
    if quantity <= 0 {
        return Err(CommerceError::InvalidQuantity(quantity));
    }
    if quantity > MAX_QUANTITY_PER_ITEM {
        return Err(CommerceError::QuantityExceedsLimit(
            quantity,
            MAX_QUANTITY_PER_ITEM,
        ));
    }
    Ok(quantity)
}

/// A session cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    pub id: CartId,
    #[serde(default, deserialize_with = "wire::string_or_empty")]
    pub session_key: String,
    #[serde(default, deserialize_with = "wire::lenient_vec")]
    pub items: Vec<CartItem>,
    /// Backend-computed total.
    pub total: Money,
    #[serde(default)]
    pub item_count: i64,
    #[serde(default, deserialize_with = "wire::optional_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "wire::optional_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Cart {
    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find the line holding `product_id`.
    pub fn find_item(&self, product_id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.product_id == product_id)
    }

    /// Total units across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Sum of line subtotals, for cross-checking the backend total.
    pub fn subtotal(&self) -> Result<Money, CommerceError> {
        Money::sum(self.items.iter().map(|item| &item.subtotal), Currency::default())
    }
}

/// A line in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    pub id: CartItemId,
    #[serde(default, deserialize_with = "wire::lenient_option")]
    pub product: Option<Product>,
    pub product_id: ProductId,
    pub quantity: i64,
    pub subtotal: Money,
    #[serde(default, deserialize_with = "wire::optional_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "wire::optional_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body of `POST /api/cart/add/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddToCart {
    pub product_id: ProductId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
}

impl AddToCart {
    /// Add one unit; the backend defaults the quantity.
    pub fn one(product_id: ProductId) -> Self {
        Self {
            product_id,
            quantity: None,
        }
    }

    /// Add `quantity` units.
    pub fn new(product_id: ProductId, quantity: i64) -> Result<Self, CommerceError> {
        Ok(Self {
            product_id,
            quantity: Some(validate_quantity(quantity)?),
        })
    }
}

/// Body of `PUT /api/cart/items/{id}/`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateCartItem {
    pub quantity: i64,
}

impl UpdateCartItem {
    pub fn new(quantity: i64) -> Result<Self, CommerceError> {
        Ok(Self {
            quantity: validate_quantity(quantity)?,
        })
    }
}
