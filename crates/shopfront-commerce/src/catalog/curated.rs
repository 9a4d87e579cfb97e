//! Editorially curated product placements (best-selling, hot).

use crate::catalog::Product;
use crate::ids::CuratedEntryId;
use crate::wire;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A curated reference to a product with a manual ordering.
///
/// `product` is `None` when the backend record is unresolved or malformed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CuratedEntry {
    pub id: CuratedEntryId,
    #[serde(default, deserialize_with = "wire::lenient_option")]
    pub product: Option<Product>,
    #[serde(default)]
    pub order: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "wire::optional_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "wire::optional_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Entry in the best-selling list.
pub type BestSelling = CuratedEntry;

/// Entry in the hot list.
pub type Hot = CuratedEntry;

impl CuratedEntry {
    pub fn new(id: CuratedEntryId, product: Option<Product>, order: i32) -> Self {
        Self {
            id,
            product,
            order,
            is_active: true,
            created_at: None,
            updated_at: None,
        }
    }
}

/// Products of curated entries in the given order, dropping unresolved ones.
pub fn resolved_products(entries: &[CuratedEntry]) -> Vec<&Product> {
    entries.iter().filter_map(|e| e.product.as_ref()).collect()
}

fn default_active() -> bool {
    true
}
