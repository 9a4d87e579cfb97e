//! Product card.

use shopfront_commerce::catalog::Product;
use shopfront_commerce::Money;

use crate::context::RenderContext;
use crate::escape::html_escape;

/// Call to action on orderable cards ("Order now").
pub const ORDER_LABEL: &str = "অর্ডার করুন";
pub const SOLD_OUT_LABEL: &str = "Sold Out";

/// Render one product card.
pub fn render_product_card(ctx: &RenderContext, product: &Product) -> String {
    let name = html_escape(&product.name);
    let image = match ctx.image(product.image.as_deref()) {
        Some(src) => format!(
            r#"<img src="{}" alt="{}" loading="lazy">"#,
            html_escape(&src),
            name
        ),
        None => r#"<div class="img-placeholder">No Image</div>"#.to_string(),
    };

    let discount_badge = match product.discount_percent() {
        Some(percent) if percent > 0 => format!(r#"<span class="badge-sale">{}% OFF</span>"#, percent),
        _ => String::new(),
    };
    let sold_out_badge = if product.is_orderable() {
        String::new()
    } else {
        format!(r#"<span class="badge-sold-out">{}</span>"#, SOLD_OUT_LABEL)
    };

    let order = if product.is_orderable() {
        format!(
            r#"<a href="/order?productId={}" class="btn-order">{}</a>"#,
            product.id, ORDER_LABEL
        )
    } else {
        format!(
            r#"<span class="btn-order disabled" aria-disabled="true">{}</span>"#,
            SOLD_OUT_LABEL
        )
    };

    format!(
        r#"<article class="product-card" data-product-id="{id}">
    <a href="/products/{id}" class="product-link">
        <div class="product-image">{image}{discount_badge}{sold_out_badge}</div>
    </a>
    <div class="product-info">
        <a href="/products/{id}" class="product-link">
            <div class="product-title">{name}</div>
            <div class="product-category">{category}</div>
        </a>
        <div class="product-price">{price}</div>
        {order}
    </div>
</article>"#,
        id = product.id,
        image = image,
        discount_badge = discount_badge,
        sold_out_badge = sold_out_badge,
        name = name,
        category = html_escape(&product.category_label()),
        price = render_price(product),
        order = order,
    )
}

pub(crate) fn render_price(product: &Product) -> String {
    match product.offer_price {
        Some(offer) if product.has_offer => format!(
            r#"<s class="price-regular">{}</s> <span class="price-current">{}</span>"#,
            struck_price(&product.regular_price),
            html_escape(&offer.display())
        ),
        _ => format!(
            r#"<span class="price-current">{}</span>"#,
            html_escape(&product.regular_price.display())
        ),
    }
}

/// Struck-through list price; taka sits flush against the number.
fn struck_price(price: &Money) -> String {
    if price.currency.symbol_trails() {
        format!("{}{}", price.whole_units(), price.currency.symbol())
    } else {
        html_escape(&price.display())
    }
}

/// Placeholder cards shown while a section has nothing to show.
pub fn render_card_skeletons(count: usize) -> String {
    r#"<div class="product-card skeleton" aria-hidden="true"></div>"#.repeat(count)
}

/// A grid of product cards.
pub fn render_product_grid<'a>(
    ctx: &RenderContext,
    products: impl IntoIterator<Item = &'a Product>,
) -> String {
    let cards: String = products
        .into_iter()
        .map(|product| render_product_card(ctx, product))
        .collect::<Vec<_>>()
        .join("\n");
    format!(r#"<div class="product-grid">{}</div>"#, cards)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopfront_commerce::{Currency, ProductId};

    fn ctx() -> RenderContext {
        RenderContext::new("http://api.test")
    }

    fn tee() -> Product {
        Product::new(ProductId::new(7), "Tee <Limited>", Money::new(120_000, Currency::BDT))
            .with_image("media/tee.jpg")
    }

    #[test]
    fn test_plain_card() {
        let html = render_product_card(&ctx(), &tee());
        assert!(html.contains(r#"src="http://api.test/media/tee.jpg""#));
        assert!(html.contains("Tee &lt;Limited&gt;"));
        assert!(html.contains("1200 ৳"));
        assert!(html.contains("/order?productId=7"));
        assert!(html.contains(ORDER_LABEL));
        assert!(!html.contains("% OFF"));
        assert!(!html.contains("<s "));
    }

    #[test]
    fn test_offer_card_shows_discount_and_both_prices() {
        let product = tee().with_offer(Money::new(90_000, Currency::BDT));
        let html = render_product_card(&ctx(), &product);
        assert!(html.contains("25% OFF"));
        assert!(html.contains(r#"<s class="price-regular">1200৳</s>"#));
        assert!(html.contains("900 ৳"));
    }

    #[test]
    fn test_sold_out_card() {
        let html = render_product_card(&ctx(), &tee().with_stock(0));
        assert!(html.contains("badge-sold-out"));
        assert!(!html.contains("/order?productId="));
        assert!(!html.contains(ORDER_LABEL));
    }

    #[test]
    fn test_missing_image_placeholder() {
        let product = Product::new(ProductId::new(1), "Cap", Money::new(50_000, Currency::BDT));
        assert!(render_product_card(&ctx(), &product).contains("No Image"));
    }

    #[test]
    fn test_skeletons() {
        assert_eq!(render_card_skeletons(3).matches("skeleton").count(), 3);
        assert_eq!(render_card_skeletons(0), "");
    }
}
