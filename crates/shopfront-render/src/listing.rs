//! `/products` page body.

use shopfront_commerce::catalog::Product;
use shopfront_commerce::listing::{CategoryContext, ListingQuery};

use crate::card::render_product_grid;
use crate::context::RenderContext;
use crate::escape::html_escape;

/// What the listing has to show.
#[derive(Debug, Clone, Copy)]
pub enum ListingBody<'a> {
    Products(&'a [Product]),
    /// The product fetch failed; carries the message to show.
    Failed(&'a str),
}

/// Render the listing heading, filter chips and product grid.
pub fn render_listing(
    ctx: &RenderContext,
    query: &ListingQuery,
    category: Option<&CategoryContext>,
    body: ListingBody<'_>,
) -> String {
    let mut html = String::from(r#"<section class="listing" data-section="listing">"#);

    html.push_str(&format!(
        r#"<h1 class="listing-title">{}</h1>"#,
        html_escape(&query.title(category))
    ));
    if let Some(description) = query.description(category) {
        html.push_str(&format!(
            r#"<p class="listing-description">{}</p>"#,
            html_escape(&description)
        ));
    }

    if let Some(context) = category.filter(|_| query.is_category_view()) {
        html.push_str(&render_filter_chips(query, context));
    }

    match body {
        ListingBody::Failed(message) => {
            html.push_str(&format!(
                r#"<div class="section-error">{}</div>"#,
                html_escape(message)
            ));
        }
        ListingBody::Products([]) => {
            html.push_str(&format!(
                r#"<div class="section-empty">{}</div>"#,
                html_escape(&query.empty_message())
            ));
            if query.search.is_some() {
                html.push_str(r#"<a href="/products" class="btn-outline">View All Products</a>"#);
            }
        }
        ListingBody::Products(products) => {
            html.push_str(&render_product_grid(ctx, products));
        }
    }

    html.push_str("</section>");
    html
}

fn render_filter_chips(query: &ListingQuery, context: &CategoryContext) -> String {
    if context.filter_options.len() < 2 {
        return String::new();
    }

    let chips: String = context
        .filter_options
        .iter()
        .map(|option| {
            let active = query.category.as_deref() == Some(option.slug.as_str());
            format!(
                r#"<a href="{}" class="filter-chip{}"{}>{}</a>"#,
                html_escape(&query.filter_url(&option.slug)),
                if active { " active" } else { "" },
                if active { r#" aria-current="page""# } else { "" },
                html_escape(&option.name)
            )
        })
        .collect();

    format!(r#"<nav class="filter-chips" aria-label="Subcategories">{}</nav>"#, chips)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopfront_commerce::catalog::Category;
    use shopfront_commerce::{CategoryId, Currency, Money, ProductId};

    fn ctx() -> RenderContext {
        RenderContext::new("http://api.test")
    }

    fn tree() -> Vec<Category> {
        vec![Category::new_root(CategoryId::new(1), "Men", "men")
            .with_child(CategoryId::new(11), "Shirts", "men-shirts")
            .with_child(CategoryId::new(12), "Panjabi", "men-panjabi")]
    }

    #[test]
    fn test_category_view_has_chips() {
        let query = ListingQuery::new().with_category("men-shirts");
        let context = CategoryContext::resolve(&tree(), "men-shirts");
        let products = vec![Product::new(ProductId::new(1), "Oxford", Money::new(1, Currency::BDT))];

        let html = render_listing(&ctx(), &query, Some(&context), ListingBody::Products(&products));
        assert!(html.contains("<h1 class=\"listing-title\">Shirts</h1>"));
        assert!(html.contains(">All</a>"));
        assert!(html.contains(r#"href="/products?category=men-panjabi""#));
        assert!(html.contains(r#"class="filter-chip active" aria-current="page">Shirts"#));
    }

    #[test]
    fn test_search_empty_state() {
        let query = ListingQuery::new().with_search("<zzz>");
        let html = render_listing(&ctx(), &query, None, ListingBody::Products(&[]));
        assert!(html.contains("Search Results for &quot;&lt;zzz&gt;&quot;"));
        assert!(!html.contains("listing-description"));
        assert!(html.contains("No products found matching"));
        assert!(html.contains("View All Products"));
    }

    #[test]
    fn test_failure_message() {
        let query = ListingQuery::new().best_selling();
        let html = render_listing(&ctx(), &query, None, ListingBody::Failed("Failed to load products"));
        assert!(html.contains("Trending Products"));
        assert!(html.contains(r#"<div class="section-error">Failed to load products</div>"#));
    }
}
