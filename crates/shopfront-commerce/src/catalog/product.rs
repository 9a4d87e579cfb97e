//! Product types.
//!
//! The backend sends category data in two shapes: an embedded `category`
//! object and a flat `category_slug` string. Both are folded into a single
//! [`CategoryRef`] when a [`Product`] is deserialized, so nothing downstream
//! needs to know which shape was on the wire.

use crate::error::CommerceError;
use crate::ids::{ColorId, ProductId};
use crate::money::Money;
use crate::wire;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Normalized category reference attached to a product.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryRef {
    /// The product's own (possibly child) category slug.
    pub slug: Option<String>,
    /// Display name of the product's category.
    pub name: Option<String>,
    /// Slug of the parent category when the product sits in a subcategory.
    pub parent_slug: Option<String>,
    /// Display name of the parent category.
    pub parent_name: Option<String>,
}

impl CategoryRef {
    /// Reference to a top-level category.
    pub fn top_level(slug: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            slug: Some(slug.into()),
            name: Some(name.into()),
            parent_slug: None,
            parent_name: None,
        }
    }

    /// Reference to a subcategory of `parent_slug`.
    pub fn child(
        slug: impl Into<String>,
        name: impl Into<String>,
        parent_slug: impl Into<String>,
        parent_name: impl Into<String>,
    ) -> Self {
        Self {
            slug: Some(slug.into()),
            name: Some(name.into()),
            parent_slug: Some(parent_slug.into()),
            parent_name: Some(parent_name.into()),
        }
    }

    /// Reference carrying only a slug, as produced from a flat `category_slug`.
    pub fn from_slug(slug: impl Into<String>) -> Self {
        Self {
            slug: Some(slug.into()),
            ..Self::default()
        }
    }

    /// Lower-cased slug of the top-level category: the parent's slug when
    /// present, otherwise the category's own slug.
    pub fn top_level_slug(&self) -> Option<String> {
        self.parent_slug
            .as_deref()
            .or(self.slug.as_deref())
            .map(str::to_lowercase)
    }

    /// Human label: `"Parent - Child"` for subcategories, else the name.
    pub fn label(&self) -> Option<String> {
        match (&self.parent_name, &self.name) {
            (Some(parent), Some(name)) => Some(format!("{parent} - {name}")),
            (None, Some(name)) => Some(name.clone()),
            _ => self.slug.clone(),
        }
    }

    fn is_empty(&self) -> bool {
        self.slug.is_none() && self.parent_slug.is_none()
    }
}

/// A selectable color of a product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductColor {
    pub id: ColorId,
    #[serde(default, deserialize_with = "wire::string_or_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "wire::optional_string")]
    pub image: Option<String>,
    #[serde(default)]
    pub order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "ProductRecord")]
pub struct Product {
    /// Backend product identifier.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Full description.
    pub description: String,
    /// Normalized category reference, absent when the record carries none.
    pub category: Option<CategoryRef>,
    /// List price.
    pub regular_price: Money,
    /// Discounted price, if an offer is configured.
    pub offer_price: Option<Money>,
    /// Price the customer pays right now.
    pub current_price: Money,
    /// Whether the offer price is in effect.
    pub has_offer: bool,
    /// Primary image reference (relative path or absolute URL).
    pub image: Option<String>,
    pub image2: Option<String>,
    pub image3: Option<String>,
    pub image4: Option<String>,
    /// Units in stock.
    pub stock: i64,
    /// Whether the product is listed.
    pub is_active: bool,
    /// Available colors.
    pub colors: Vec<ProductColor>,
    /// Creation time; `None` when the backend value could not be parsed.
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Create an active, in-stock product with no offer.
    pub fn new(id: ProductId, name: impl Into<String>, regular_price: Money) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            category: None,
            regular_price,
            offer_price: None,
            current_price: regular_price,
            has_offer: false,
            image: None,
            image2: None,
            image3: None,
            image4: None,
            stock: 1,
            is_active: true,
            colors: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Set the category reference.
    pub fn with_category(mut self, category: CategoryRef) -> Self {
        self.category = Some(category);
        self
    }

    /// Set the creation time.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Put the product on offer at `offer_price`.
    pub fn with_offer(mut self, offer_price: Money) -> Self {
        self.offer_price = Some(offer_price);
        self.current_price = offer_price;
        self.has_offer = true;
        self
    }

    /// Set the stock level.
    pub fn with_stock(mut self, stock: i64) -> Self {
        self.stock = stock;
        self
    }

    /// Set the primary image.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Lower-cased slug of the product's top-level category.
    pub fn top_level_slug(&self) -> Option<String> {
        self.category.as_ref().and_then(CategoryRef::top_level_slug)
    }

    /// Whole-percent discount shown on the product badge.
    ///
    /// `round((regular - offer) / regular * 100)`, only when the product is on
    /// offer with a positive regular price.
    pub fn discount_percent(&self) -> Option<i64> {
        if !self.has_offer || !self.regular_price.is_positive() {
            return None;
        }
        let offer = self.offer_price?;
        let savings = self.regular_price.amount_minor - offer.amount_minor;
        Some((savings as f64 / self.regular_price.amount_minor as f64 * 100.0).round() as i64)
    }

    /// Whether the product can be ordered.
    pub fn is_orderable(&self) -> bool {
        self.stock > 0
    }

    /// Category text shown under the product name.
    pub fn category_label(&self) -> String {
        self.category
            .as_ref()
            .and_then(CategoryRef::label)
            .unwrap_or_default()
    }

    /// Image references in display order, skipping empty slots.
    pub fn images(&self) -> Vec<&str> {
        [&self.image, &self.image2, &self.image3, &self.image4]
            .into_iter()
            .filter_map(|img| img.as_deref())
            .collect()
    }
}

/// Embedded category object as sent by the backend.
#[derive(Debug, Deserialize)]
struct CategoryRecord {
    #[serde(default, deserialize_with = "wire::optional_string")]
    slug: Option<String>,
    #[serde(default, deserialize_with = "wire::optional_string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "wire::optional_string")]
    parent_slug: Option<String>,
    #[serde(default, deserialize_with = "wire::optional_string")]
    parent_name: Option<String>,
}

/// Product record exactly as the backend sends it.
#[derive(Debug, Deserialize)]
struct ProductRecord {
    id: ProductId,
    name: String,
    #[serde(default, deserialize_with = "wire::string_or_empty")]
    description: String,
    #[serde(default, deserialize_with = "wire::lenient_option")]
    category: Option<CategoryRecord>,
    #[serde(default, deserialize_with = "wire::optional_string")]
    category_slug: Option<String>,
    regular_price: Money,
    #[serde(default, deserialize_with = "wire::optional_money")]
    offer_price: Option<Money>,
    #[serde(default, deserialize_with = "wire::optional_money")]
    current_price: Option<Money>,
    #[serde(default)]
    has_offer: bool,
    #[serde(default, deserialize_with = "wire::optional_string")]
    image: Option<String>,
    #[serde(default, deserialize_with = "wire::optional_string")]
    image2: Option<String>,
    #[serde(default, deserialize_with = "wire::optional_string")]
    image3: Option<String>,
    #[serde(default, deserialize_with = "wire::optional_string")]
    image4: Option<String>,
    #[serde(default)]
    stock: i64,
    #[serde(default = "default_true")]
    is_active: bool,
    #[serde(default, deserialize_with = "wire::lenient_vec")]
    colors: Vec<ProductColor>,
    #[serde(default, deserialize_with = "wire::optional_timestamp")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "wire::optional_timestamp")]
    updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<ProductRecord> for Product {
    type Error = CommerceError;

    fn try_from(record: ProductRecord) -> Result<Self, Self::Error> {
        let name = record.name.trim().to_string();
        if name.is_empty() {
            return Err(CommerceError::ValidationError(format!(
                "product {} has no name",
                record.id
            )));
        }

        let category = normalize_category(record.category, record.category_slug);
        let current_price = record.current_price.unwrap_or(match record.offer_price {
            Some(offer) if record.has_offer => offer,
            _ => record.regular_price,
        });

        Ok(Product {
            id: record.id,
            name,
            description: record.description,
            category,
            regular_price: record.regular_price,
            offer_price: record.offer_price,
            current_price,
            has_offer: record.has_offer,
            image: record.image,
            image2: record.image2,
            image3: record.image3,
            image4: record.image4,
            stock: record.stock,
            is_active: record.is_active,
            colors: record.colors,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

/// Fold the two wire shapes into one reference. The embedded object wins;
/// the flat slug fills in only when the object carries no slug of its own.
fn normalize_category(
    embedded: Option<CategoryRecord>,
    flat_slug: Option<String>,
) -> Option<CategoryRef> {
    let reference = match embedded {
        Some(record) => CategoryRef {
            slug: record.slug.or(flat_slug),
            name: record.name,
            parent_slug: record.parent_slug,
            parent_name: record.parent_name,
        },
        None => CategoryRef {
            slug: flat_slug,
            ..CategoryRef::default()
        },
    };
    if reference.is_empty() {
        None
    } else {
        Some(reference)
    }
}

fn default_true() -> bool {
    true
}
