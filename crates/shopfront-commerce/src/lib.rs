//! Storefront domain types and logic.
//!
//! This crate models what the storefront reads from and writes to its
//! backend, and holds the logic that turns that data into pages:
//!
//! - **Catalog**: products, the category tree, curated placements
//! - **Homepage**: derivation of the homepage view-model
//! - **Listing**: the `/products` page modes, titles and category filters
//! - **Cart / Checkout**: cart shapes and validated order bodies
//! - **Site**: announcement bar, tracking pixels, hero image
//!
//! Backend records are normalized once at deserialization: blank strings
//! become `None`, unparseable timestamps become `None`, the two category
//! shapes collapse into [`CategoryRef`], and malformed records inside lists
//! are skipped.
//!
//! # Example
//!
//! ```rust,ignore
//! use shopfront_commerce::prelude::*;
//!
//! let data: HomepageData = serde_json::from_str(&body)?;
//! let derived = derive_homepage(Some(&data), &categories, chrono::Utc::now());
//! println!("{}", serde_json::to_string(&derived)?);
//! ```

pub mod error;
pub mod ids;
pub mod money;
pub mod wire;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod homepage;
pub mod listing;
pub mod site;

pub use catalog::CategoryRef;
pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{
        find_in_tree, BestSelling, Category, CategoryChild, CategoryRef, CategorySummary,
        CuratedEntry, Hot, Product, ProductColor, ProductMeta, TreeMatch,
    };

    // Homepage
    pub use crate::homepage::{
        derive_homepage, new_drops, CategorySection, HomepageData, HomepageDerived, LOAD_ERROR,
    };

    // Listing
    pub use crate::listing::{CategoryContext, FilterOption, ListingMode, ListingQuery};

    // Cart
    pub use crate::cart::{AddToCart, Cart, CartItem, UpdateCartItem};

    // Checkout
    pub use crate::checkout::{
        CreateMultiProductOrder, CreateOrder, CreateOrderProductItem, CreateSingleProductOrder,
        CustomerDetails, Order, OrderDraft, OrderPayload, OrderStatus,
    };

    // Site
    pub use crate::site::{facebook_pixel_id, Notification, SiteSettings, TrackingCode};
}
