//! Storefront homepage workload.
//!
//! Loads everything the homepage needs in parallel, derives the view-model
//! and renders the page. Every backend read is fail-soft: a missing homepage
//! payload turns into the derived error state, the other reads fall back to
//! their defaults.

use chrono::{DateTime, Utc};
use futures::join;

use shopfront_commerce::catalog::{Category, CategorySummary};
use shopfront_commerce::homepage::{derive_homepage, HomepageDerived};
use shopfront_commerce::site::{facebook_pixel_id, Notification};
use shopfront_data::loader::{fetch_categories_tree, fetch_homepage_data, fetch_site_settings};
use shopfront_data::StorefrontApi;
use shopfront_observability::{MetricsCollector, StructuredLogger};
use shopfront_render::{
    render_category_section, render_feature_tiles, render_hero, render_hot_section,
    render_notification_bar, render_tracking_script, HeadContent, RenderContext, Shell,
};

/// Workload name used in logs and metrics.
pub const WORKLOAD: &str = "homepage";

const PAGE_TITLE: &str = "AP Brand | Premium Apparel";

/// Homepage loader bound to a backend.
#[derive(Debug, Clone)]
pub struct HomepageWorkload {
    api: StorefrontApi,
    render: RenderContext,
}

impl HomepageWorkload {
    /// Images resolve against the API base URL.
    pub fn new(api: StorefrontApi) -> Self {
        let render = RenderContext::new(api.client().base_url());
        Self { api, render }
    }

    /// Fetch and derive the homepage as of `now`.
    pub async fn load(&self, now: DateTime<Utc>, logger: &StructuredLogger) -> HomepagePage {
        logger.debug("Starting parallel homepage fetches");

        let (data, tree, settings, notification, tracking) = join!(
            fetch_homepage_data(&self.api),
            fetch_categories_tree(&self.api),
            fetch_site_settings(&self.api),
            self.api.active_notification(),
            self.api.active_tracking_codes(),
        );

        let categories = top_level_summaries(&tree);
        let derived = derive_homepage(data.as_ref(), &categories, now);

        logger
            .info_builder("Homepage derived")
            .field_bool("error", derived.is_error())
            .field_i64("categories", categories.len() as i64)
            .field_i64("hot", derived.hot_products.len() as i64)
            .field_bool("new_drop", derived.new_drops_featured.is_some())
            .emit();

        let hero_url = settings
            .as_ref()
            .and_then(|s| self.render.image(s.hero_image.as_deref()));

        HomepagePage {
            derived,
            hero_url,
            notification,
            pixel_id: facebook_pixel_id(&tracking).map(str::to_string),
            render: self.render.clone(),
        }
    }
}

/// Summaries of the top-level categories, in tree order.
pub fn top_level_summaries(tree: &[Category]) -> Vec<CategorySummary> {
    tree.iter()
        .filter(|c| c.is_root())
        .map(Category::summary)
        .collect()
}

/// A loaded homepage, ready to render.
#[derive(Debug, Clone)]
pub struct HomepagePage {
    pub derived: HomepageDerived,
    /// Absolute hero image URL from site settings.
    pub hero_url: Option<String>,
    pub notification: Option<Notification>,
    pub pixel_id: Option<String>,
    render: RenderContext,
}

impl HomepagePage {
    /// Rendered sections in page order, paired with their names.
    pub fn sections(&self) -> Vec<(String, String)> {
        let mut sections = vec![
            ("hero".to_string(), render_hero(&self.render, self.hero_url.as_deref())),
            ("hot".to_string(), render_hot_section(&self.render, &self.derived)),
            ("tiles".to_string(), render_feature_tiles(&self.render, &self.derived)),
        ];
        for section in &self.derived.category_sections {
            sections.push((
                format!("category:{}", section.category.slug),
                render_category_section(&self.render, section, self.derived.is_error()),
            ));
        }
        sections
    }

    /// Full HTML document.
    pub fn render(&self) -> String {
        self.render_page(self.sections())
    }

    /// Full HTML document, recording each section into `metrics`.
    pub fn render_recorded(&self, metrics: &mut MetricsCollector) -> String {
        let sections = self.sections();
        let fallback = self.derived.is_error();
        for (name, html) in &sections {
            metrics.record_section(name, html.len(), fallback);
        }
        self.render_page(sections)
    }

    /// The derived view-model as JSON.
    pub fn derived_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.derived)
    }

    fn render_page(&self, sections: Vec<(String, String)>) -> String {
        let head = HeadContent::new(PAGE_TITLE)
            .with_meta("viewport", "width=device-width, initial-scale=1")
            .with_meta("description", "Premium apparel for men, women and couples")
            .with_raw(render_tracking_script(self.pixel_id.as_deref()));
        let shell = Shell::new(head).with_banner(&render_notification_bar(self.notification.as_ref()));

        let bodies: Vec<String> = sections
            .into_iter()
            .map(|(_, html)| html)
            .filter(|html| !html.is_empty())
            .collect();
        shell.render_page(&bodies)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::TimeZone;
    use shopfront_core::RequestId;
    use shopfront_data::{ApiClient, InMemoryTransport};

    use super::*;

    const BASE: &str = "http://api.test";

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap()
    }

    fn workload(transport: &Arc<InMemoryTransport>) -> HomepageWorkload {
        HomepageWorkload::new(StorefrontApi::new(ApiClient::new(BASE, transport.clone())))
    }

    fn logger() -> StructuredLogger {
        StructuredLogger::new(RequestId::from_string("test")).with_workload(WORKLOAD)
    }

    const HOMEPAGE: &str = r#"{
        "products": [
            {"id": 1, "name": "Oxford Shirt", "regular_price": "1200.00", "stock": 3,
             "category": {"id": 11, "name": "Shirts", "slug": "men-shirts",
                          "parent_name": "Men", "parent_slug": "men"},
             "created_at": "2024-06-09T08:00:00Z"},
            {"id": 2, "name": "Silk Saree", "regular_price": "5400.00", "stock": 0,
             "category": {"id": 21, "name": "Sarees", "slug": "women-sarees",
                          "parent_name": "Women", "parent_slug": "women"},
             "created_at": "2024-05-01T08:00:00Z"}
        ],
        "best_selling": [{"id": 1, "product": {"id": 2, "name": "Silk Saree", "regular_price": "5400.00"}}],
        "hot": [{"id": 1, "product": {"id": 1, "name": "Oxford Shirt", "regular_price": "1200.00"}}]
    }"#;

    const TREE: &str = r#"[
        {"id": 1, "name": "Men", "slug": "men", "children": [{"id": 11, "name": "Shirts", "slug": "men-shirts"}]},
        {"id": 2, "name": "Women", "slug": "women", "children": []}
    ]"#;

    #[tokio::test]
    async fn test_full_homepage() {
        let transport = Arc::new(InMemoryTransport::new());
        transport
            .get_json(&format!("{BASE}/api/homepage/"), HOMEPAGE)
            .get_json(&format!("{BASE}/api/categories/tree/"), TREE)
            .get_json(&format!("{BASE}/api/site-settings/"), r#"{"hero_image":"media/hero.jpg"}"#)
            .get_json(
                &format!("{BASE}/api/notifications/active/"),
                r#"{"id":1,"message":"Free delivery","is_active":true}"#,
            )
            .get_json(
                &format!("{BASE}/api/tracking-codes/active/"),
                r#"[{"id":1,"name":"Meta","code":"","pixel_id":"998877"}]"#,
            );

        let page = workload(&transport).load(now(), &logger()).await;
        assert!(!page.derived.is_error());
        assert_eq!(page.derived.new_drops_featured.as_ref().unwrap().name, "Oxford Shirt");
        assert_eq!(page.derived.trending_featured.as_ref().unwrap().name, "Silk Saree");
        assert_eq!(page.derived.category_sections.len(), 2);
        assert_eq!(page.hero_url.as_deref(), Some("http://api.test/media/hero.jpg"));
        assert_eq!(page.pixel_id.as_deref(), Some("998877"));

        let html = page.render();
        assert!(html.contains("Free delivery"));
        assert!(html.contains("fbq('init','998877')"));
        assert!(html.contains("Special Offers"));
        assert!(html.contains("Explore our Women collection"));
        assert!(!html.contains("No Women products available"));
    }

    #[tokio::test]
    async fn test_backend_down_renders_error_state() {
        let transport = Arc::new(InMemoryTransport::new());
        transport.get_json(&format!("{BASE}/api/categories/tree/"), TREE);

        let page = workload(&transport).load(now(), &logger()).await;
        assert_eq!(page.derived, HomepageDerived::failed());
        assert!(page.hero_url.is_none());
        assert!(page.notification.is_none());

        let mut metrics = MetricsCollector::new(RequestId::from_string("test"));
        let html = page.render_recorded(&mut metrics);
        assert!(html.contains("Failed to load products"));
        assert!(html.contains("/media/apb-hero.png"));
        assert!(!html.contains("facebook-pixel"));

        let summary = metrics.finalize(Some(200));
        assert!(summary.sections.values().all(|s| s.used_fallback));
        assert!(summary.sections.contains_key("hero"));
    }

    #[test]
    fn test_top_level_summaries() {
        let tree: Vec<Category> = serde_json::from_str(TREE).unwrap();
        let names: Vec<_> = top_level_summaries(&tree).into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Men", "Women"]);
    }

    #[test]
    fn test_derived_json_is_camel_case() {
        let page = HomepagePage {
            derived: HomepageDerived::failed(),
            hero_url: None,
            notification: None,
            pixel_id: None,
            render: RenderContext::new(BASE),
        };
        let json = page.derived_json().unwrap();
        assert!(json.contains(r#""newDropsFeatured":null"#));
        assert!(json.contains(r#""error":"Failed to load products""#));
    }
}
