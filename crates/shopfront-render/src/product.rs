//! Product detail section.

use shopfront_commerce::catalog::Product;

use crate::card::{render_price, ORDER_LABEL, SOLD_OUT_LABEL};
use crate::context::RenderContext;
use crate::escape::html_escape;

/// Render the gallery, price and description of one product.
pub fn render_product_detail(ctx: &RenderContext, product: &Product) -> String {
    let name = html_escape(&product.name);
    let images: Vec<String> = product
        .images()
        .into_iter()
        .filter_map(|reference| ctx.image(Some(reference)))
        .collect();

    let gallery = match images.split_first() {
        Some((main, rest)) => {
            let thumbnails: String = rest
                .iter()
                .map(|src| {
                    format!(
                        r#"<img src="{}" alt="{}" class="product-thumbnail" loading="lazy">"#,
                        html_escape(src),
                        name
                    )
                })
                .collect();
            format!(
                r#"<img src="{}" alt="{}" class="product-image-main"><div class="product-thumbnails">{}</div>"#,
                html_escape(main),
                name,
                thumbnails
            )
        }
        None => r#"<div class="img-placeholder">No Image</div>"#.to_string(),
    };

    let discount = match product.discount_percent() {
        Some(percent) if percent > 0 => format!(r#"<span class="badge-sale">{}% OFF</span>"#, percent),
        _ => String::new(),
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
        r#"<section class="product-detail" data-section="product" data-product-id="{id}">
    <div class="product-gallery">{gallery}</div>
    <div class="product-info">
        <h1 class="product-name">{name}</h1>
        <p class="product-category">{category}</p>
        <div class="product-price">{price}{discount}</div>
        {order}
        <div class="product-description">{description}</div>
    </div>
</section>"#,
        id = product.id,
        gallery = gallery,
        name = name,
        category = html_escape(&product.category_label()),
        price = render_price(product),
        discount = discount,
        order = order,
        description = html_escape(&product.description),
    )
}

/// Shown in place of the detail section when the product could not be loaded.
pub fn render_product_unavailable() -> String {
    r#"<section class="product-detail product-detail--error" data-section="product">
    <p class="error-message">This product is not available.</p>
    <a href="/products" class="btn-primary">View All Products</a>
</section>"#
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopfront_commerce::{Currency, Money, ProductId};

    fn ctx() -> RenderContext {
        RenderContext::new("http://api.test")
    }

    #[test]
    fn test_detail_gallery_and_price() {
        let mut product =
            Product::new(ProductId::new(4), "Linen <Panjabi>", Money::new(250_000, Currency::BDT))
                .with_image("media/a.jpg")
                .with_offer(Money::new(200_000, Currency::BDT));
        product.image3 = Some("media/c.jpg".to_string());
        product.description = "Breathable & light".to_string();

        let html = render_product_detail(&ctx(), &product);
        assert!(html.contains(r#"class="product-image-main""#));
        assert!(html.contains("http://api.test/media/a.jpg"));
        assert_eq!(html.matches(r#"class="product-thumbnail""#).count(), 1);
        assert!(html.contains("Linen &lt;Panjabi&gt;"));
        assert!(html.contains("20% OFF"));
        assert!(html.contains("Breathable &amp; light"));
        assert!(html.contains("/order?productId=4"));
    }

    #[test]
    fn test_sold_out_detail_without_images() {
        let product = Product::new(ProductId::new(5), "Cap", Money::new(50_000, Currency::BDT))
            .with_stock(0);
        let html = render_product_detail(&ctx(), &product);
        assert!(html.contains("No Image"));
        assert!(html.contains(SOLD_OUT_LABEL));
        assert!(!html.contains("/order?productId="));
    }

    #[test]
    fn test_unavailable_links_back_to_listing() {
        assert!(render_product_unavailable().contains(r#"href="/products""#));
    }
}
