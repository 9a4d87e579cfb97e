//! Axum router serving the storefront pages.
//!
//! Routes:
//! - `GET /` - homepage
//! - `GET /products` - product listing (`category`, `search`, `best_selling`, `new_drops`)
//! - `GET /products/{id}` - product detail
//! - `POST /api/orders` - place an order
//! - `GET /api/homepage` - derived homepage view-model as JSON
//! - `GET /healthz` - liveness

use std::sync::{Arc, Mutex, PoisonError};

use axum::extract::{Path, Query, State};
use axum::http::header::{HeaderName, COOKIE};
use axum::http::{HeaderMap, HeaderValue, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use homepage::HomepageWorkload;
use product_detail::ProductWorkload;
use product_listing::ListingWorkload;
use shopfront_commerce::checkout::CustomerDetails;
use shopfront_commerce::listing::ListingQuery;
use shopfront_commerce::{Currency, Money, ProductId};
use shopfront_core::{LifecyclePhase, RequestContext, StorefrontConfig, REQUEST_ID_HEADER};
use shopfront_data::{ApiClient, FetchError, StorefrontApi};
use shopfront_observability::{MetricsCollector, StructuredLogger, SERVER_TIMING_HEADER};

/// Workload name for order placement.
const CHECKOUT: &str = "checkout";

/// State shared by every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    client: ApiClient,
    delivery_charge: Money,
}

impl AppState {
    /// Handlers build their per-request clients from `client`, so its cache
    /// is shared across requests.
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            delivery_charge: Money::zero(Currency::default()),
        }
    }

    /// Flat delivery charge added to every order.
    pub fn with_delivery_charge(mut self, charge: Money) -> Self {
        self.delivery_charge = charge;
        self
    }

    pub fn from_config(config: &StorefrontConfig) -> Result<Self, FetchError> {
        let charge = Money::new(config.checkout.delivery_charge_minor(), Currency::default());
        Ok(Self::new(ApiClient::from_config(config)?).with_delivery_charge(charge))
    }
}

/// Body of `POST /api/orders`.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderRequest {
    #[serde(flatten)]
    pub customer: CustomerDetails,
    pub items: Vec<OrderLine>,
}

/// One requested product line.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub color: String,
    pub quantity: i64,
}

/// Build the storefront router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(homepage_html))
        .route("/products", get(products_html))
        .route("/products/{id}", get(product_html))
        .route("/api/orders", post(place_order))
        .route("/api/homepage", get(homepage_json))
        .route("/healthz", get(healthz))
        .with_state(state)
}

/// Request-scoped context, logger, metrics and backend client.
struct RequestScope {
    request: RequestContext,
    logger: StructuredLogger,
    metrics: Arc<Mutex<MetricsCollector>>,
    api: StorefrontApi,
}

impl RequestScope {
    fn begin(state: &AppState, uri: &Uri, headers: &HeaderMap, workload: &str) -> Self {
        let target = uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or_else(|| uri.path());
        let request = headers
            .iter()
            .filter_map(|(name, value)| Some((name.as_str(), value.to_str().ok()?)))
            .fold(RequestContext::get(target), |ctx, (name, value)| {
                ctx.with_header(name, value)
            });
        let request_id = request.request_id.clone();

        let logger = StructuredLogger::new(request_id.clone())
            .with_workload(workload)
            .with_route(&request.path);

        let mut collector = MetricsCollector::new(request_id.clone());
        collector.set_workload(workload);
        collector.set_route(&request.path);
        let metrics = Arc::new(Mutex::new(collector));

        let mut client = state
            .client
            .clone()
            .with_request_id(&request_id)
            .with_metrics(metrics.clone());
        if let Some(cookie) = request.header(COOKIE.as_str()) {
            client = client.with_cookie(cookie);
        }

        logger.debug("Request started");
        Self {
            request,
            logger,
            metrics,
            api: StorefrontApi::new(client).with_delivery_charge(state.delivery_charge),
        }
    }

    fn record<T>(&self, f: impl FnOnce(&mut MetricsCollector) -> T) -> T {
        let mut guard = self.metrics.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Every backend fetch has settled.
    fn data_loaded(&mut self) {
        self.request.timing.mark_phase(&LifecyclePhase::DataLoaded);
        self.record(MetricsCollector::record_data_loaded);
    }

    fn rendered(&mut self) {
        self.request.timing.mark_phase(&LifecyclePhase::Rendered);
    }

    fn failed(&mut self, error: &str) {
        self.request.timing.mark_phase(&LifecyclePhase::Error(error.to_string()));
    }

    /// Attach tracing headers to `body` and log the request summary.
    fn finish(mut self, status: StatusCode, body: impl IntoResponse) -> Response {
        self.request.timing.mark_phase(&LifecyclePhase::Completion);
        let request_id = self.request.request_id.clone();
        let (timing, summary) = self.record(|metrics| {
            let timing = metrics.server_timing_header();
            let taken = std::mem::replace(metrics, MetricsCollector::new(request_id.clone()));
            (timing, taken.finalize(Some(status.as_u16())))
        });

        let time_to_data = self
            .request
            .timing
            .time_to(&LifecyclePhase::DataLoaded)
            .unwrap_or_default();
        self.logger
            .info_builder("Request complete")
            .field_i64("status", i64::from(status.as_u16()))
            .field_i64("dependencies", summary.dependencies.len() as i64)
            .field_i64(
                "failed_dependencies",
                summary.dependencies.iter().filter(|d| !d.success).count() as i64,
            )
            .duration_ms("time_to_data_ms", time_to_data)
            .duration_ms("total_ms", self.request.timing.elapsed())
            .emit();

        let mut response = (status, body).into_response();
        let headers = response.headers_mut();
        if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
            headers.insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
        }
        if let Ok(value) = HeaderValue::from_str(&timing) {
            headers.insert(HeaderName::from_static(SERVER_TIMING_HEADER), value);
        }
        response
    }
}

async fn homepage_html(State(state): State<AppState>, uri: Uri, headers: HeaderMap) -> Response {
    let mut scope = RequestScope::begin(&state, &uri, &headers, homepage::WORKLOAD);
    let page = HomepageWorkload::new(scope.api.clone())
        .load(Utc::now(), &scope.logger)
        .await;
    scope.data_loaded();
    let html = scope.record(|metrics| page.render_recorded(metrics));
    scope.rendered();
    scope.finish(StatusCode::OK, Html(html))
}

async fn homepage_json(State(state): State<AppState>, uri: Uri, headers: HeaderMap) -> Response {
    let mut scope = RequestScope::begin(&state, &uri, &headers, homepage::WORKLOAD);
    let page = HomepageWorkload::new(scope.api.clone())
        .load(Utc::now(), &scope.logger)
        .await;
    scope.data_loaded();
    scope.finish(StatusCode::OK, Json(page.derived))
}

async fn products_html(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let mut scope = RequestScope::begin(&state, &uri, &headers, product_listing::WORKLOAD);
    let page = ListingWorkload::new(scope.api.clone())
        .load(query, Utc::now(), &scope.logger)
        .await;
    scope.data_loaded();
    let html = scope.record(|metrics| page.render_recorded(metrics));
    scope.rendered();
    scope.finish(StatusCode::OK, Html(html))
}

async fn product_html(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let mut scope = RequestScope::begin(&state, &uri, &headers, product_detail::WORKLOAD);
    let page = ProductWorkload::new(scope.api.clone())
        .load(ProductId::new(id), &scope.logger)
        .await;
    scope.data_loaded();
    let html = scope.record(|metrics| page.render_recorded(metrics));
    scope.rendered();
    let status = match &page.product {
        Ok(_) => StatusCode::OK,
        Err(error) if error.is_not_found() => StatusCode::NOT_FOUND,
        Err(_) => StatusCode::BAD_GATEWAY,
    };
    scope.finish(status, Html(html))
}

async fn place_order(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
    Json(order): Json<OrderRequest>,
) -> Response {
    let mut scope = RequestScope::begin(&state, &uri, &headers, CHECKOUT);
    let (status, body) = submit_order(&scope, order).await;
    scope.data_loaded();
    if let Some(error) = body.get("error").and_then(|e| e.as_str()) {
        scope.failed(error);
    }
    scope.finish(status, Json(body))
}

/// Resolve the requested products, build the order and post it.
async fn submit_order(
    scope: &RequestScope,
    order: OrderRequest,
) -> (StatusCode, serde_json::Value) {
    let fetched = futures::future::join_all(
        order
            .items
            .iter()
            .map(|line| scope.api.product(line.product_id)),
    )
    .await;

    let mut draft = scope.api.draft_order(order.customer);
    for (line, product) in order.items.into_iter().zip(fetched) {
        match product {
            Ok(product) => draft = draft.add_line(product, line.size, line.color, line.quantity),
            Err(error) if error.is_not_found() => {
                let message = format!("product {} not found", line.product_id);
                return (StatusCode::UNPROCESSABLE_ENTITY, json!({ "error": message }));
            }
            Err(error) => {
                scope
                    .logger
                    .warn_builder("Product lookup failed")
                    .field_i64("product_id", line.product_id.get())
                    .field("error", error.to_string())
                    .emit();
                return (StatusCode::BAD_GATEWAY, json!({ "error": error.to_string() }));
            }
        }
    }

    let payload = match draft.build() {
        Ok(payload) => payload,
        Err(error) => {
            return (StatusCode::UNPROCESSABLE_ENTITY, json!({ "error": error.to_string() }));
        }
    };

    match scope.api.submit_order(&payload).await {
        Ok(placed) => {
            scope
                .logger
                .info_builder("Order placed")
                .field_i64("order_id", placed.id.get())
                .field_i64("lines", payload.line_count() as i64)
                .emit();
            (StatusCode::CREATED, json!(placed))
        }
        Err(error) => {
            scope
                .logger
                .warn_builder("Order submission failed")
                .field("error", error.to_string())
                .emit();
            (StatusCode::BAD_GATEWAY, json!({ "error": error.to_string() }))
        }
    }
}

async fn healthz() -> &'static str {
    "ok"
}
