//! Head metadata for product detail pages.

use serde::Serialize;

use super::Product;

/// Suffix of every product page title.
pub const STORE_NAME: &str = "AP Brand Store";

/// Longest description placed in the page head, in characters.
pub const DESCRIPTION_LIMIT: usize = 160;

/// Title and description for a product page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductMeta {
    pub title: String,
    pub description: Option<String>,
}

impl ProductMeta {
    /// Metadata for `product`, or the generic title when it could not be loaded.
    pub fn for_product(product: Option<&Product>) -> Self {
        let Some(product) = product else {
            return Self {
                title: format!("Product | {}", STORE_NAME),
                description: None,
            };
        };

        let name = product.name.trim();
        let name = if name.is_empty() { "Product" } else { name };
        let description = if product.description.trim().is_empty() {
            format!("View product details at {}.", STORE_NAME)
        } else {
            product.description.chars().take(DESCRIPTION_LIMIT).collect()
        };

        Self {
            title: format!("{} | {}", name, STORE_NAME),
            description: Some(description),
        }
    }
}
