//! Storefront `/products` listing workload.
//!
//! One page serves five modes picked from the query string: trending, new
//! drops, search results, a category and everything. Category views also
//! resolve the category tree for the heading and subcategory filters.

use chrono::{DateTime, Utc};
use futures::future::{self, Either};

use shopfront_commerce::catalog::{resolved_products, Product};
use shopfront_commerce::homepage::LOAD_ERROR;
use shopfront_commerce::listing::{CategoryContext, ListingMode, ListingQuery};
use shopfront_data::loader::fetch_categories_tree;
use shopfront_data::{FetchError, StorefrontApi};
use shopfront_observability::{MetricsCollector, StructuredLogger};
use shopfront_render::{render_listing, HeadContent, ListingBody, RenderContext, Shell};

/// Workload name used in logs and metrics.
pub const WORKLOAD: &str = "product-listing";

/// Listing loader bound to a backend.
#[derive(Debug, Clone)]
pub struct ListingWorkload {
    api: StorefrontApi,
    render: RenderContext,
}

impl ListingWorkload {
    pub fn new(api: StorefrontApi) -> Self {
        let render = RenderContext::new(api.client().base_url());
        Self { api, render }
    }

    /// Fetch the listing for `query` as of `now`.
    pub async fn load(
        &self,
        query: ListingQuery,
        now: DateTime<Utc>,
        logger: &StructuredLogger,
    ) -> ListingPage {
        let mode = query.mode();
        logger
            .debug_builder("Loading listing")
            .field("mode", mode.as_str())
            .emit();

        let tree = if query.is_category_view() {
            Either::Left(fetch_categories_tree(&self.api))
        } else {
            Either::Right(future::ready(Vec::new()))
        };
        let (products, tree) = future::join(self.fetch_products(&query), tree).await;

        let category = query
            .category
            .as_deref()
            .filter(|_| query.is_category_view())
            .map(|slug| CategoryContext::resolve(&tree, slug));

        let products = match products {
            Ok(products) => {
                let narrowed = query.narrow(products, now);
                logger
                    .info_builder("Listing loaded")
                    .field("mode", mode.as_str())
                    .field_i64("products", narrowed.len() as i64)
                    .emit();
                Ok(narrowed)
            }
            Err(error) => {
                logger
                    .warn_builder("Listing fetch failed")
                    .field("mode", mode.as_str())
                    .field("error", error.to_string())
                    .emit();
                Err(LOAD_ERROR.to_string())
            }
        };

        ListingPage {
            query,
            category,
            products,
            render: self.render.clone(),
        }
    }

    async fn fetch_products(&self, query: &ListingQuery) -> Result<Vec<Product>, FetchError> {
        if query.mode() == ListingMode::BestSelling {
            let entries = self.api.best_selling().await?;
            return Ok(resolved_products(&entries).into_iter().cloned().collect());
        }
        self.api
            .list_products(query.search.as_deref(), query.category.as_deref())
            .await
    }
}

/// A loaded listing, ready to render.
#[derive(Debug, Clone)]
pub struct ListingPage {
    pub query: ListingQuery,
    /// Set for category views.
    pub category: Option<CategoryContext>,
    /// Products to show, or the message to show instead.
    pub products: Result<Vec<Product>, String>,
    render: RenderContext,
}

impl ListingPage {
    /// Page heading.
    pub fn title(&self) -> String {
        self.query.title(self.category.as_ref())
    }

    /// The listing section alone.
    pub fn body(&self) -> String {
        let body = match &self.products {
            Ok(products) => ListingBody::Products(products),
            Err(message) => ListingBody::Failed(message),
        };
        render_listing(&self.render, &self.query, self.category.as_ref(), body)
    }

    /// Full HTML document.
    pub fn render(&self) -> String {
        self.render_page(self.body())
    }

    /// Full HTML document, recording the listing section into `metrics`.
    pub fn render_recorded(&self, metrics: &mut MetricsCollector) -> String {
        let body = self.body();
        metrics.record_section("listing", body.len(), self.products.is_err());
        self.render_page(body)
    }

    fn render_page(&self, body: String) -> String {
        let head = HeadContent::new(format!("{} | AP Brand", self.title()))
            .with_meta("viewport", "width=device-width, initial-scale=1");
        Shell::new(head).render_page(&[body])
    }
}
