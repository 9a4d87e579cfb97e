//! Order types.

use crate::ids::{OrderId, ProductId};
use crate::money::{self, Money};
use crate::wire;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Order status as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order placed, awaiting processing.
    #[default]
    Pending,
    /// Order confirmed by the shop.
    Confirmed,
    /// Order being prepared.
    Processing,
    /// Order handed to the courier.
    Shipped,
    /// Order delivered.
    Delivered,
    /// Order cancelled.
    Cancelled,
    /// A status this storefront does not know about.
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Unknown => "unknown",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
            OrderStatus::Unknown => "Unknown",
        }
    }

    /// Check if order is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

/// An order as returned by `POST /api/orders/create/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: OrderId,
    pub customer_name: String,
    #[serde(default, deserialize_with = "wire::string_or_empty")]
    pub customer_phone: String,
    #[serde(default, deserialize_with = "wire::string_or_empty")]
    pub shipping_address: String,
    pub total_amount: Money,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default, deserialize_with = "wire::optional_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// The minimal single-product order body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateOrder {
    pub customer_name: String,
    pub district: String,
    pub address: String,
    pub phone_number: String,
    pub product_id: ProductId,
    pub product_size: String,
    pub quantity: i64,
}

/// One product line of an order body. Prices are JSON numbers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateOrderProductItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub product_size: String,
    pub product_color: String,
    pub product_image: Option<String>,
    pub quantity: i64,
    #[serde(with = "money::as_number")]
    pub unit_price: Money,
    #[serde(with = "money::as_number")]
    pub product_total: Money,
}

/// Order body carrying several product lines.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateMultiProductOrder {
    pub customer_name: String,
    pub district: String,
    pub address: String,
    pub phone_number: String,
    pub products: Vec<CreateOrderProductItem>,
    #[serde(with = "money::as_number")]
    pub product_total: Money,
    #[serde(with = "money::as_number")]
    pub delivery_charge: Money,
    #[serde(with = "money::as_number")]
    pub total_price: Money,
}

/// Order body carrying exactly one product line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateSingleProductOrder {
    pub customer_name: String,
    pub district: String,
    pub address: String,
    pub phone_number: String,
    pub product: CreateOrderProductItem,
    #[serde(with = "money::as_number")]
    pub product_total: Money,
    #[serde(with = "money::as_number")]
    pub delivery_charge: Money,
    #[serde(with = "money::as_number")]
    pub total_price: Money,
}

/// Either order body; both post to the same endpoint.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum OrderPayload {
    Single(CreateSingleProductOrder),
    Multi(CreateMultiProductOrder),
}

impl OrderPayload {
    /// Grand total including delivery.
    pub fn total_price(&self) -> Money {
        match self {
            OrderPayload::Single(order) => order.total_price,
            OrderPayload::Multi(order) => order.total_price,
        }
    }

    /// Number of product lines.
    pub fn line_count(&self) -> usize {
        match self {
            OrderPayload::Single(_) => 1,
            OrderPayload::Multi(order) => order.products.len(),
        }
    }
}
