//! Router tests against an in-memory backend.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use shopfront_cli::server::{router, AppState};
use shopfront_commerce::{Currency, Money};
use shopfront_data::{ApiClient, InMemoryTransport, Method, Response};
use tower::ServiceExt;

const BASE: &str = "http://api.test";

fn app(transport: &Arc<InMemoryTransport>) -> axum::Router {
    router(AppState::new(ApiClient::new(BASE, transport.clone())))
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, String) {
    let request = Request::builder()
        .uri(uri)
        .header("x-request-id", "req-42")
        .body(Body::empty())
        .expect("request should build");
    let response = app.oneshot(request).await.expect("router should respond");
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should read");
    (status, headers, String::from_utf8_lossy(&body).into_owned())
}

fn seeded() -> Arc<InMemoryTransport> {
    let transport = Arc::new(InMemoryTransport::new());
    transport
        .get_json(
            &format!("{BASE}/api/homepage/"),
            r#"{"products": [{"id": 1, "name": "Oxford Shirt", "regular_price": "1200.00",
                "stock": 4, "category_slug": "men"}],
               "best_selling": [], "hot": []}"#,
        )
        .get_json(
            &format!("{BASE}/api/categories/tree/"),
            r#"[{"id": 1, "name": "Men", "slug": "men", "children": []}]"#,
        )
        .get_json(
            &format!("{BASE}/api/best-selling/"),
            r#"[{"id": 3, "product": {"id": 1, "name": "Oxford Shirt", "regular_price": "1200.00"}}]"#,
        );
    transport
}

#[tokio::test]
async fn healthz_is_ok() {
    let (status, _, body) = get(app(&Arc::new(InMemoryTransport::new())), "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn homepage_renders_sections_with_tracing_headers() {
    let (status, headers, body) = get(app(&seeded()), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["x-request-id"], "req-42");
    let timing = headers["server-timing"].to_str().unwrap();
    assert!(timing.contains("homepage;dur="));
    assert!(timing.contains("total;dur="));
    assert!(body.contains("Explore our Men collection"));
    assert!(body.contains("Oxford Shirt"));
}

#[tokio::test]
async fn homepage_json_reports_backend_failure() {
    let (status, _, body) = get(app(&Arc::new(InMemoryTransport::new())), "/api/homepage").await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["error"], "Failed to load products");
    assert_eq!(json["hotProducts"], serde_json::json!([]));
    assert!(json["trendingFeatured"].is_null());
}

#[tokio::test]
async fn products_route_reads_query() {
    let transport = seeded();
    let (status, _, body) = get(app(&transport), "/products?best_selling=true").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Trending Products"));
    assert!(body.contains("Oxford Shirt"));
    assert_eq!(transport.hits(&format!("{BASE}/api/best-selling/")), 1);
}

#[tokio::test]
async fn products_route_decodes_search() {
    let transport = seeded();
    transport.get_json(&format!("{BASE}/api/products/?search=blue%20shirt"), "[]");
    let (status, _, body) = get(app(&transport), "/products?search=blue+shirt").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Search Results for &quot;blue shirt&quot;"));
    assert_eq!(transport.hits(&format!("{BASE}/api/products/?search=blue%20shirt")), 1);
}

#[tokio::test]
async fn product_route_sets_head_metadata() {
    let transport = Arc::new(InMemoryTransport::new());
    transport
        .get_json(
            &format!("{BASE}/api/products/7/"),
            r#"{"id": 7, "name": "Linen Panjabi", "regular_price": "2500.00", "stock": 1,
                "description": "Hand-finished linen."}"#,
        )
        .get_status(&format!("{BASE}/api/products/8/"), 404);

    let (status, _, body) = get(app(&transport), "/products/7").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<title>Linen Panjabi | AP Brand Store</title>"));
    assert!(body.contains(r#"content="Hand-finished linen.""#));

    let (status, _, body) = get(app(&transport), "/products/8").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("<title>Product | AP Brand Store</title>"));
}

async fn post_json(
    app: axum::Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build");
    let response = app.oneshot(request).await.expect("router should respond");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should read");
    (status, serde_json::from_slice(&body).expect("body should be JSON"))
}

fn order_body(quantity: i64) -> serde_json::Value {
    serde_json::json!({
        "customer_name": "Rahim",
        "district": "Dhaka",
        "address": "House 1, Road 2",
        "phone_number": "01700000000",
        "items": [{"product_id": 1, "size": "M", "color": "Blue", "quantity": quantity}]
    })
}

#[tokio::test]
async fn order_route_adds_configured_delivery_charge() {
    let transport = Arc::new(InMemoryTransport::new());
    transport
        .get_json(
            &format!("{BASE}/api/products/1/"),
            r#"{"id": 1, "name": "Oxford Shirt", "regular_price": "1200.00", "stock": 4}"#,
        )
        .on(
            Method::POST,
            &format!("{BASE}/api/orders/create/"),
            Ok(Response::json_body(
                201,
                r#"{"id": 90, "customer_name": "Rahim", "total_amount": "2520.00", "status": "pending"}"#,
            )),
        );
    let state = AppState::new(ApiClient::new(BASE, transport.clone()))
        .with_delivery_charge(Money::new(12_000, Currency::BDT));

    let (status, body) = post_json(router(state), "/api/orders", order_body(2)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 90);

    let sent = transport
        .sent()
        .into_iter()
        .find(|r| r.method == Method::POST)
        .expect("order should be posted");
    let posted: serde_json::Value = serde_json::from_slice(sent.body.as_deref().unwrap()).unwrap();
    assert_eq!(posted["delivery_charge"], 120.0);
    assert_eq!(posted["product_total"], 2400.0);
    assert_eq!(posted["total_price"], 2520.0);
}

#[tokio::test]
async fn order_route_rejects_invalid_quantity() {
    let transport = Arc::new(InMemoryTransport::new());
    transport.get_json(
        &format!("{BASE}/api/products/1/"),
        r#"{"id": 1, "name": "Oxford Shirt", "regular_price": "1200.00", "stock": 4}"#,
    );

    let (status, body) = post_json(app(&transport), "/api/orders", order_body(0)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());
    assert!(transport.sent().iter().all(|r| r.method != Method::POST));
}
