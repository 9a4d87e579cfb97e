//! Homepage derivation.
//!
//! Turns the raw homepage payload into the view-model the homepage renders:
//! the featured new drop, the featured trending product, the hot list and one
//! section per known top-level category.
//!
//! # Example
//!
//! ```rust,ignore
//! use shopfront_commerce::homepage::{derive_homepage, HomepageData};
//!
//! let data: Option<HomepageData> = fetch_homepage().await;
//! let derived = derive_homepage(data.as_ref(), &categories, chrono::Utc::now());
//! if let Some(message) = &derived.error {
//!     // render skeletons
//! }
//! ```

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{resolved_products, BestSelling, CategorySummary, Hot, Product};
use crate::wire;

/// Length of the trailing new-drops window.
pub const NEW_DROPS_WINDOW_DAYS: i64 = 3;

/// Message set on the derived view when the payload could not be loaded.
pub const LOAD_ERROR: &str = "Failed to load products";

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Raw homepage payload: every active product plus the curated lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HomepageData {
    #[serde(default, deserialize_with = "wire::lenient_vec")]
    pub products: Vec<Product>,
    #[serde(default, deserialize_with = "wire::lenient_vec")]
    pub best_selling: Vec<BestSelling>,
    #[serde(default, deserialize_with = "wire::lenient_vec")]
    pub hot: Vec<Hot>,
}

/// Products belonging to one top-level category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategorySection {
    pub category: CategorySummary,
    pub products: Vec<Product>,
}

/// The homepage view-model.
///
/// Field names serialize in camelCase. Featured slots serialize as `null`
/// when absent and lists as `[]` when empty; the renderer relies on that
/// distinction, checking `error` first.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HomepageDerived {
    pub new_drops_featured: Option<Product>,
    pub trending_featured: Option<Product>,
    pub hot_products: Vec<Product>,
    pub category_sections: Vec<CategorySection>,
    pub error: Option<String>,
}

impl HomepageDerived {
    /// The view shown when the payload is unavailable.
    pub fn failed() -> Self {
        Self {
            error: Some(LOAD_ERROR.to_string()),
            ..Self::default()
        }
    }

    /// Whether the payload failed to load.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Derive the homepage view-model.
///
/// `data` is `None` when the upstream fetch failed. `now` is the instant the
/// new-drops window is measured from. The function has no other inputs and
/// never fails.
pub fn derive_homepage(
    data: Option<&HomepageData>,
    categories: &[CategorySummary],
    now: DateTime<Utc>,
) -> HomepageDerived {
    let Some(data) = data else {
        return HomepageDerived::failed();
    };

    HomepageDerived {
        new_drops_featured: new_drops(&data.products, now).first().map(|p| (*p).clone()),
        trending_featured: data.best_selling.first().and_then(|entry| entry.product.clone()),
        hot_products: resolved_products(&data.hot).into_iter().cloned().collect(),
        category_sections: category_sections(&data.products, categories),
        error: None,
    }
}

/// Start of the new-drops window, inclusive.
pub fn new_drops_cutoff(now: DateTime<Utc>) -> i64 {
    now.timestamp_millis() - NEW_DROPS_WINDOW_DAYS * MILLIS_PER_DAY
}

/// Products created inside the new-drops window, newest first.
///
/// Times are compared at millisecond resolution. Products created in the same
/// millisecond keep their input order. Products without a creation time are
/// left out.
pub fn new_drops(products: &[Product], now: DateTime<Utc>) -> Vec<&Product> {
    let cutoff = new_drops_cutoff(now);
    let mut recent: Vec<(i64, &Product)> = products
        .iter()
        .filter_map(|p| p.created_at.map(|created| (created.timestamp_millis(), p)))
        .filter(|(created, _)| *created >= cutoff)
        .collect();
    recent.sort_by(|a, b| b.0.cmp(&a.0));
    recent.into_iter().map(|(_, p)| p).collect()
}

/// One section per category, in the order given.
///
/// A product lands in the section whose slug equals its top-level slug,
/// compared lower-case. When two categories share a slug only the first gets
/// a section.
pub fn category_sections(
    products: &[Product],
    categories: &[CategorySummary],
) -> Vec<CategorySection> {
    let keyed: Vec<(Option<String>, &Product)> =
        products.iter().map(|p| (p.top_level_slug(), p)).collect();
    let mut seen = HashSet::new();

    categories
        .iter()
        .filter(|category| seen.insert(category.slug.to_lowercase()))
        .map(|category| {
            let key = category.slug.to_lowercase();
            let products = keyed
                .iter()
                .filter(|(slug, _)| slug.as_deref() == Some(key.as_str()))
                .map(|(_, p)| (*p).clone())
                .collect();
            CategorySection {
                category: category.clone(),
                products,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CategoryRef, CuratedEntry};
    use crate::ids::{CategoryId, CuratedEntryId, ProductId};
    use crate::money::{Currency, Money};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap()
    }

    fn product(id: i64) -> Product {
        Product::new(
            ProductId::new(id),
            format!("Product {id}"),
            Money::new(100000, Currency::BDT),
        )
    }

    fn created(id: i64, at: DateTime<Utc>) -> Product {
        product(id).with_created_at(at)
    }

    fn entry(id: i64, product: Option<Product>, order: i32) -> CuratedEntry {
        CuratedEntry::new(CuratedEntryId::new(id), product, order)
    }

    fn category(id: i64, slug: &str) -> CategorySummary {
        CategorySummary::new(CategoryId::new(id), slug.to_uppercase(), slug)
    }

    fn ids(products: &[Product]) -> Vec<i64> {
        products.iter().map(|p| p.id.get()).collect()
    }

    #[test]
    fn test_null_payload_sets_error() {
        let derived = derive_homepage(None, &[category(1, "men")], now());
        assert!(derived.new_drops_featured.is_none());
        assert!(derived.trending_featured.is_none());
        assert!(derived.hot_products.is_empty());
        assert!(derived.category_sections.is_empty());
        assert_eq!(derived.error.as_deref(), Some(LOAD_ERROR));
        assert!(derived.is_error());
    }

    #[test]
    fn test_payload_present_means_no_error() {
        let data = HomepageData::default();
        let derived = derive_homepage(Some(&data), &[], now());
        assert!(derived.error.is_none());
        assert!(derived.new_drops_featured.is_none());
        assert!(derived.hot_products.is_empty());
        assert!(derived.category_sections.is_empty());
    }

    #[test]
    fn test_new_drops_picks_newest_inside_window() {
        let data = HomepageData {
            products: vec![
                created(1, now() - Duration::days(1)),
                created(2, now() - Duration::days(4)),
                created(3, now() - Duration::days(2)),
            ],
            ..Default::default()
        };
        let derived = derive_homepage(Some(&data), &[], now());
        assert_eq!(derived.new_drops_featured.map(|p| p.id.get()), Some(1));

        let drops: Vec<i64> = new_drops(&data.products, now()).iter().map(|p| p.id.get()).collect();
        assert_eq!(drops, vec![1, 3]);
    }

    #[test]
    fn test_new_drops_window_is_inclusive() {
        let edge = now() - Duration::days(NEW_DROPS_WINDOW_DAYS);
        let products = vec![
            created(1, edge - Duration::milliseconds(1)),
            created(2, edge),
        ];
        let drops = new_drops(&products, now());
        assert_eq!(drops.len(), 1);
        assert_eq!(drops[0].id.get(), 2);
    }

    #[test]
    fn test_new_drops_ties_keep_input_order() {
        let at = now() - Duration::hours(5);
        let data = HomepageData {
            products: vec![created(7, at), created(8, at), created(9, at - Duration::hours(1))],
            ..Default::default()
        };
        let derived = derive_homepage(Some(&data), &[], now());
        assert_eq!(derived.new_drops_featured.map(|p| p.id.get()), Some(7));
    }

    #[test]
    fn test_new_drops_compares_at_millisecond_resolution() {
        let at = now() - Duration::hours(1);
        let products = vec![
            created(1, at),
            created(2, at + Duration::microseconds(400)),
        ];
        let drops: Vec<i64> = new_drops(&products, now()).iter().map(|p| p.id.get()).collect();
        assert_eq!(drops, vec![1, 2]);
    }

    #[test]
    fn test_new_drops_skips_missing_created_at() {
        let products = vec![product(1), created(2, now() - Duration::days(10))];
        assert!(new_drops(&products, now()).is_empty());
    }

    #[test]
    fn test_trending_is_first_entry_as_given() {
        let data = HomepageData {
            best_selling: vec![entry(1, Some(product(10)), 2), entry(2, Some(product(20)), 1)],
            ..Default::default()
        };
        let derived = derive_homepage(Some(&data), &[], now());
        assert_eq!(derived.trending_featured.map(|p| p.id.get()), Some(10));
    }

    #[test]
    fn test_trending_absent_when_first_entry_unresolved() {
        let data = HomepageData {
            best_selling: vec![entry(1, None, 1), entry(2, Some(product(20)), 2)],
            ..Default::default()
        };
        let derived = derive_homepage(Some(&data), &[], now());
        assert!(derived.trending_featured.is_none());
    }

    #[test]
    fn test_hot_drops_unresolved_and_keeps_order() {
        let data = HomepageData {
            hot: vec![
                entry(1, Some(product(30)), 3),
                entry(2, None, 1),
                entry(3, Some(product(31)), 2),
            ],
            ..Default::default()
        };
        let derived = derive_homepage(Some(&data), &[], now());
        assert_eq!(ids(&derived.hot_products), vec![30, 31]);
    }

    #[test]
    fn test_category_bucketing_by_top_level_slug() {
        let data = HomepageData {
            products: vec![
                product(1).with_category(CategoryRef::child("men-shirt", "Shirt", "men", "Men")),
                product(2).with_category(CategoryRef::from_slug("womens")),
                product(3).with_category(CategoryRef::top_level("combo", "Combo")),
            ],
            ..Default::default()
        };
        let categories = vec![category(1, "men"), category(2, "womens")];
        let derived = derive_homepage(Some(&data), &categories, now());

        assert_eq!(derived.category_sections.len(), 2);
        assert_eq!(derived.category_sections[0].category.slug, "men");
        assert_eq!(ids(&derived.category_sections[0].products), vec![1]);
        assert_eq!(derived.category_sections[1].category.slug, "womens");
        assert_eq!(ids(&derived.category_sections[1].products), vec![2]);
    }

    #[test]
    fn test_bucketing_is_case_insensitive_exact_match() {
        let data = HomepageData {
            products: vec![
                product(1).with_category(CategoryRef::from_slug("MEN")),
                product(2).with_category(CategoryRef::from_slug("menswear")),
            ],
            ..Default::default()
        };
        let derived = derive_homepage(Some(&data), &[category(1, "men")], now());
        assert_eq!(ids(&derived.category_sections[0].products), vec![1]);
    }

    #[test]
    fn test_child_slug_matching_other_category_uses_parent() {
        let data = HomepageData {
            products: vec![product(1).with_category(CategoryRef::child("womens", "W", "men", "Men"))],
            ..Default::default()
        };
        let categories = vec![category(1, "men"), category(2, "womens")];
        let derived = derive_homepage(Some(&data), &categories, now());
        assert_eq!(ids(&derived.category_sections[0].products), vec![1]);
        assert!(derived.category_sections[1].products.is_empty());
    }

    #[test]
    fn test_uncategorized_product_still_featured() {
        let loose = created(5, now() - Duration::hours(2));
        let data = HomepageData {
            products: vec![loose.clone()],
            best_selling: vec![entry(1, Some(loose.clone()), 1)],
            hot: vec![entry(2, Some(loose), 1)],
        };
        let derived = derive_homepage(Some(&data), &[category(1, "men")], now());
        assert!(derived.category_sections[0].products.is_empty());
        assert_eq!(derived.new_drops_featured.map(|p| p.id.get()), Some(5));
        assert_eq!(derived.trending_featured.map(|p| p.id.get()), Some(5));
        assert_eq!(ids(&derived.hot_products), vec![5]);
    }

    #[test]
    fn test_duplicate_category_slugs_keep_first() {
        let data = HomepageData {
            products: vec![product(1).with_category(CategoryRef::from_slug("men"))],
            ..Default::default()
        };
        let categories = vec![category(1, "men"), category(2, "MEN")];
        let derived = derive_homepage(Some(&data), &categories, now());
        assert_eq!(derived.category_sections.len(), 1);
        assert_eq!(derived.category_sections[0].category.id, CategoryId::new(1));
    }

    #[test]
    fn test_empty_categories_give_no_sections() {
        let data = HomepageData {
            products: vec![product(1).with_category(CategoryRef::from_slug("men"))],
            ..Default::default()
        };
        let derived = derive_homepage(Some(&data), &[], now());
        assert!(derived.category_sections.is_empty());
    }

    #[test]
    fn test_derivation_is_idempotent() {
        let data = HomepageData {
            products: vec![
                created(1, now() - Duration::hours(3)).with_category(CategoryRef::from_slug("men")),
                created(2, now() - Duration::days(5)),
            ],
            best_selling: vec![entry(1, Some(product(2)), 1)],
            hot: vec![entry(2, Some(product(1)), 1), entry(3, None, 2)],
        };
        let categories = vec![category(1, "men")];
        let first = derive_homepage(Some(&data), &categories, now());
        let second = derive_homepage(Some(&data), &categories, now());
        assert_eq!(first, second);
    }

    #[test]
    fn test_serialized_shape() {
        let derived = derive_homepage(None, &[], now());
        let json = serde_json::to_value(&derived).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "newDropsFeatured": null,
                "trendingFeatured": null,
                "hotProducts": [],
                "categorySections": [],
                "error": "Failed to load products"
            })
        );
    }

    #[test]
    fn test_payload_with_malformed_product_still_derives() {
        let data: HomepageData = serde_json::from_str(
            r#"{
                "products": [
                    {"id": 1, "name": "Good", "regular_price": "500.00", "category_slug": "men",
                     "created_at": "2024-06-09T12:00:00Z"},
                    {"id": 2, "name": "Broken"}
                ],
                "best_selling": null
            }"#,
        )
        .unwrap();
        assert_eq!(data.products.len(), 1);
        assert!(data.best_selling.is_empty());
        assert!(data.hot.is_empty());

        let derived = derive_homepage(Some(&data), &[category(1, "men")], now());
        assert_eq!(derived.new_drops_featured.map(|p| p.id.get()), Some(1));
        assert_eq!(ids(&derived.category_sections[0].products), vec![1]);
    }
}
