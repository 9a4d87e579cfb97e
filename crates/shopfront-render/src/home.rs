//! Homepage sections.

use shopfront_commerce::catalog::Product;
use shopfront_commerce::homepage::{CategorySection, HomepageDerived};
use shopfront_commerce::site::Notification;

use crate::card::{render_card_skeletons, render_product_grid};
use crate::context::RenderContext;
use crate::escape::html_escape;

/// Hot picks shown before "View more".
pub const HOT_VISIBLE: usize = 4;
/// Products shown per category section before "View More".
pub const CATEGORY_VISIBLE: usize = 8;
/// Hero image used when site settings carry none.
pub const DEFAULT_HERO_PATH: &str = "/media/apb-hero.png";

/// Announcement bar above the header.
pub fn render_notification_bar(notification: Option<&Notification>) -> String {
    match notification {
        Some(n) => format!(
            r#"<div class="notification-bar" role="status">{}</div>"#,
            html_escape(&n.message)
        ),
        None => String::new(),
    }
}

/// Hero banner. `hero_url` is already absolute; `None` uses the default image.
pub fn render_hero(ctx: &RenderContext, hero_url: Option<&str>) -> String {
    let src = hero_url
        .map(str::to_string)
        .or_else(|| ctx.image(Some(DEFAULT_HERO_PATH)))
        .unwrap_or_else(|| DEFAULT_HERO_PATH.to_string());

    format!(
        r#"<section class="hero" data-section="hero">
    <img src="{}" alt="Hero banner" fetchpriority="high">
    <a href="/products" class="btn-primary">Shop Now</a>
</section>"#,
        html_escape(&src)
    )
}

/// "Special Offers" section of hot picks.
///
/// Hidden when there is nothing to show and no error. The first four cards are
/// visible; the rest sit behind a "View more" disclosure.
pub fn render_hot_section(ctx: &RenderContext, derived: &HomepageDerived) -> String {
    if derived.hot_products.is_empty() && derived.error.is_none() {
        return String::new();
    }

    let body = match &derived.error {
        Some(error) => format!(r#"<div class="section-error">{}</div>"#, html_escape(error)),
        None => {
            let (visible, more) = split_at_most(&derived.hot_products, HOT_VISIBLE);
            let mut html = render_product_grid(ctx, visible);
            if !more.is_empty() {
                html.push_str(&format!(
                    r#"<details class="view-more"><summary>View more</summary>{}</details>"#,
                    render_product_grid(ctx, more)
                ));
            }
            html
        }
    };

    format!(
        r#"<section class="hot" data-section="hot">
    <h2 class="section-heading">Special Offers</h2>
    <p class="section-subtitle">Handpicked favorites for you</p>
    {}
</section>"#,
        body
    )
}

/// New drops and trending tiles.
pub fn render_feature_tiles(ctx: &RenderContext, derived: &HomepageDerived) -> String {
    let tiles = if derived.is_error() {
        r#"<div class="tile skeleton" aria-hidden="true"></div><div class="tile skeleton" aria-hidden="true"></div>"#
            .to_string()
    } else {
        let new_drops = render_tile(
            ctx,
            "/products?new_drops=true",
            "New Drops",
            derived.new_drops_featured.as_ref(),
        );
        let trending = match &derived.trending_featured {
            Some(product) => render_tile(ctx, "/products?best_selling=true", "Trending Products", Some(product)),
            None => r#"<div class="tile placeholder" aria-hidden="true"></div>"#.to_string(),
        };
        format!("{}{}", new_drops, trending)
    };

    format!(
        r#"<section class="feature-tiles" data-section="tiles">{}</section>"#,
        tiles
    )
}

fn render_tile(ctx: &RenderContext, href: &str, label: &str, product: Option<&Product>) -> String {
    let image = match product.and_then(|p| ctx.image(p.image.as_deref())) {
        Some(src) => {
            let alt = product.map(|p| p.name.as_str()).unwrap_or(label);
            format!(r#"<img src="{}" alt="{}">"#, html_escape(&src), html_escape(alt))
        }
        None => r#"<div class="tile-placeholder"></div>"#.to_string(),
    };
    format!(
        r#"<a href="{}" class="tile" aria-label="{label}">{}<span class="tile-label">{label} &rarr;</span></a>"#,
        href,
        image,
        label = label
    )
}

/// One category section.
///
/// Error state shows eight skeleton cards; an empty category shows a message.
pub fn render_category_section(
    ctx: &RenderContext,
    section: &CategorySection,
    error: bool,
) -> String {
    let name = html_escape(&section.category.name);
    let body = if error {
        format!(
            r#"<div class="product-grid">{}</div>"#,
            render_card_skeletons(CATEGORY_VISIBLE)
        )
    } else if section.products.is_empty() {
        format!(r#"<div class="section-empty">No {} products available</div>"#, name)
    } else {
        let (visible, more) = split_at_most(&section.products, CATEGORY_VISIBLE);
        let mut html = render_product_grid(ctx, visible);
        if !more.is_empty() {
            html.push_str(&format!(
                r#"<a href="/products?category={}" class="btn-outline">View More</a>"#,
                urlencoding::encode(&section.category.slug)
            ));
        }
        html
    };

    format!(
        r#"<section class="category-section" data-section="category" data-category="{slug}">
    <h2 class="section-heading">{name}</h2>
    <p class="section-subtitle">Explore our {name} collection</p>
    {body}
</section>"#,
        slug = html_escape(&section.category.slug),
        name = name,
        body = body
    )
}

fn split_at_most(products: &[Product], n: usize) -> (&[Product], &[Product]) {
    products.split_at(products.len().min(n))
}
