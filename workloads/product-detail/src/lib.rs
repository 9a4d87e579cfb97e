//! Storefront `/products/{id}` detail workload.
//!
//! Loads one product and builds the page head from it. A failed load still
//! renders a page, with the generic product title.

use shopfront_commerce::catalog::{Product, ProductMeta};
use shopfront_commerce::ProductId;
use shopfront_data::{FetchError, StorefrontApi};
use shopfront_observability::{MetricsCollector, StructuredLogger};
use shopfront_render::{
    render_product_detail, render_product_unavailable, HeadContent, RenderContext, Shell,
};

/// Workload name used in logs and metrics.
pub const WORKLOAD: &str = "product-detail";

/// Product detail loader bound to a backend.
#[derive(Debug, Clone)]
pub struct ProductWorkload {
    api: StorefrontApi,
    render: RenderContext,
}

impl ProductWorkload {
    pub fn new(api: StorefrontApi) -> Self {
        let render = RenderContext::new(api.client().base_url());
        Self { api, render }
    }

    /// Fetch product `id`.
    pub async fn load(&self, id: ProductId, logger: &StructuredLogger) -> ProductPage {
        let product = match self.api.product(id).await {
            Ok(product) => {
                logger
                    .debug_builder("Product loaded")
                    .field_i64("product_id", id.get())
                    .emit();
                Ok(product)
            }
            Err(error) => {
                logger
                    .warn_builder("Product fetch failed")
                    .field_i64("product_id", id.get())
                    .field("error", error.to_string())
                    .emit();
                Err(error)
            }
        };
        ProductPage {
            product,
            render: self.render.clone(),
        }
    }
}

/// A loaded product page, ready to render.
#[derive(Debug, Clone)]
pub struct ProductPage {
    pub product: Result<Product, FetchError>,
    render: RenderContext,
}

impl ProductPage {
    /// Head title and description.
    pub fn meta(&self) -> ProductMeta {
        ProductMeta::for_product(self.product.as_ref().ok())
    }

    /// Whether the backend reported the product as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(&self.product, Err(error) if error.is_not_found())
    }

    /// The detail section alone.
    pub fn body(&self) -> String {
        match &self.product {
            Ok(product) => render_product_detail(&self.render, product),
            Err(_) => render_product_unavailable(),
        }
    }

    /// Full HTML document.
    pub fn render(&self) -> String {
        self.render_page(self.body())
    }

    /// Full HTML document, recording the detail section into `metrics`.
    pub fn render_recorded(&self, metrics: &mut MetricsCollector) -> String {
        let body = self.body();
        metrics.record_section("product", body.len(), self.product.is_err());
        self.render_page(body)
    }

    fn render_page(&self, body: String) -> String {
        let meta = self.meta();
        let mut head = HeadContent::new(meta.title)
            .with_meta("viewport", "width=device-width, initial-scale=1");
        if let Some(description) = meta.description.as_deref() {
            head = head.with_meta("description", description);
        }
        Shell::new(head).render_page(&[body])
    }
}
