//! Product catalog module.
//!
//! Contains types for products, categories and curated placements, plus
//! product page metadata.

mod category;
mod curated;
mod meta;
mod product;

pub use category::{find_in_tree, Category, CategoryChild, CategorySummary, TreeMatch};
pub use curated::{resolved_products, BestSelling, CuratedEntry, Hot};
pub use meta::{ProductMeta, DESCRIPTION_LIMIT, STORE_NAME};
pub use product::{CategoryRef, Product, ProductColor};
