//! Product listing page logic.
//!
//! The `/products` page serves several views from one route, selected by
//! query parameters: the best-selling list, new drops, search results, a
//! category (with subcategory filters) or the full catalog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{find_in_tree, Category, Product};
use crate::homepage::new_drops;
use crate::wire;

/// Query parameters accepted by the listing page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "ListingParams")]
pub struct ListingQuery {
    /// Category slug filter.
    pub category: Option<String>,
    /// Free-text search.
    pub search: Option<String>,
    /// `best_selling=true`.
    pub best_selling: bool,
    /// `new_drops=true`.
    pub new_drops: bool,
}

#[derive(Deserialize)]
struct ListingParams {
    #[serde(default, deserialize_with = "wire::optional_string")]
    category: Option<String>,
    #[serde(default, deserialize_with = "wire::optional_string")]
    search: Option<String>,
    #[serde(default)]
    best_selling: Option<String>,
    #[serde(default)]
    new_drops: Option<String>,
}

impl From<ListingParams> for ListingQuery {
    fn from(params: ListingParams) -> Self {
        Self {
            category: params.category,
            search: params.search,
            best_selling: params.best_selling.as_deref() == Some("true"),
            new_drops: params.new_drops.as_deref() == Some("true"),
        }
    }
}

/// Which backend list a listing is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListingMode {
    /// The curated best-selling list.
    BestSelling,
    /// The product list, narrowed to the new-drops window.
    NewDrops,
    /// Search results from the product list.
    Search,
    /// One category of the product list.
    Category,
    /// The whole product list.
    All,
}

impl ListingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingMode::BestSelling => "best_selling",
            ListingMode::NewDrops => "new_drops",
            ListingMode::Search => "search",
            ListingMode::Category => "category",
            ListingMode::All => "all",
        }
    }
}

impl ListingQuery {
    /// Create an empty query (all products).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the category filter.
    pub fn with_category(mut self, slug: impl Into<String>) -> Self {
        self.category = wire::non_empty(Some(slug.into()));
        self
    }

    /// Set the search text.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = wire::non_empty(Some(search.into()));
        self
    }

    /// Show the best-selling list.
    pub fn best_selling(mut self) -> Self {
        self.best_selling = true;
        self
    }

    /// Show new drops.
    pub fn new_drops(mut self) -> Self {
        self.new_drops = true;
        self
    }

    /// Resolve the fetch mode.
    pub fn mode(&self) -> ListingMode {
        if self.best_selling {
            ListingMode::BestSelling
        } else if self.new_drops {
            ListingMode::NewDrops
        } else if self.search.is_some() {
            ListingMode::Search
        } else if self.category.is_some() {
            ListingMode::Category
        } else {
            ListingMode::All
        }
    }

    /// A plain category page, which gets subcategory filters.
    pub fn is_category_view(&self) -> bool {
        self.category.is_some() && self.search.is_none() && !self.best_selling && !self.new_drops
    }

    /// Page heading.
    pub fn title(&self, context: Option<&CategoryContext>) -> String {
        if self.new_drops {
            return "New Drops".to_string();
        }
        if self.best_selling {
            return "Trending Products".to_string();
        }
        if let Some(search) = &self.search {
            return format!("Search Results for \"{search}\"");
        }
        match &self.category {
            None => "All Products".to_string(),
            Some(slug) => context
                .and_then(|c| c.name.clone())
                .unwrap_or_else(|| slug.clone()),
        }
    }

    /// Subheading, not shown for searches.
    pub fn description(&self, context: Option<&CategoryContext>) -> Option<String> {
        if self.search.is_some() {
            return None;
        }
        let text = if self.new_drops {
            "Newly Droped Prodcuts Just For You!".to_string()
        } else if self.best_selling {
            "Discover Our Most Popular Items".to_string()
        } else {
            match &self.category {
                None => "Explore Our Complete Collection of Premium Apparel".to_string(),
                Some(slug) => {
                    let name = context
                        .and_then(|c| c.name.clone())
                        .unwrap_or_else(|| slug.clone());
                    format!("Discover our premium {name} collection")
                }
            }
        };
        Some(text)
    }

    /// Message shown when the listing is empty.
    pub fn empty_message(&self) -> String {
        if let Some(search) = &self.search {
            format!("No products found matching \"{search}\". Try a different search term.")
        } else if self.best_selling {
            "No best selling products available".to_string()
        } else if let Some(category) = &self.category {
            format!("No {category} products available")
        } else {
            "No products available".to_string()
        }
    }

    /// Encode back into a query string (without the leading `?`).
    pub fn to_query_string(&self) -> String {
        let mut pairs = Vec::new();
        if let Some(category) = &self.category {
            pairs.push(format!("category={}", urlencoding::encode(category)));
        }
        if let Some(search) = &self.search {
            pairs.push(format!("search={}", urlencoding::encode(search)));
        }
        if self.best_selling {
            pairs.push("best_selling=true".to_string());
        }
        if self.new_drops {
            pairs.push("new_drops=true".to_string());
        }
        pairs.join("&")
    }

    /// Link to this listing with the category replaced by `slug`.
    pub fn filter_url(&self, slug: &str) -> String {
        let next = Self {
            category: Some(slug.to_string()),
            ..self.clone()
        };
        format!("/products?{}", next.to_query_string())
    }

    /// Apply the mode's post-fetch narrowing to a fetched product list.
    pub fn narrow(&self, products: Vec<Product>, now: DateTime<Utc>) -> Vec<Product> {
        if self.mode() == ListingMode::NewDrops {
            new_drops(&products, now).into_iter().cloned().collect()
        } else {
            products
        }
    }
}

/// One subcategory filter chip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterOption {
    pub slug: String,
    pub name: String,
}

/// Category information for a category view.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryContext {
    /// Display name of the current category, when found in the tree.
    pub name: Option<String>,
    /// Slug of the top-level category the current one belongs to.
    pub parent_slug: Option<String>,
    /// `All` followed by every sibling; empty unless there are at least two.
    pub filter_options: Vec<FilterOption>,
}

impl CategoryContext {
    /// Look `slug` up in the category tree.
    pub fn resolve(tree: &[Category], slug: &str) -> Self {
        let Some(found) = find_in_tree(tree, slug) else {
            return Self::default();
        };
        let parent = found.parent();
        let filter_options = if parent.children.len() > 1 {
            std::iter::once(FilterOption {
                slug: parent.slug.clone(),
                name: "All".to_string(),
            })
            .chain(parent.children.iter().map(|child| FilterOption {
                slug: child.slug.clone(),
                name: child.name.clone(),
            }))
            .collect()
        } else {
            Vec::new()
        };

        Self {
            name: Some(found.name().to_string()),
            parent_slug: Some(parent.slug.clone()),
            filter_options,
        }
    }
}
