//! Backend client with endpoint tagging, timeouts, retries and caching.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde::Serialize;
use shopfront_core::{FetchConfig, RequestId, StorefrontConfig, REQUEST_ID_HEADER};
use shopfront_observability::{DependencyMetrics, MetricsCollector};

use crate::cache::RevalidateCache;
use crate::endpoint::Endpoint;
use crate::request::{Method, Request, RequestBuilder};
use crate::response::Response;
use crate::retry::RetryPolicy;
use crate::timeout::TimeoutConfig;
use crate::transport::{HttpTransport, Transport};
use crate::FetchError;

/// Header carrying the Django CSRF token.
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Fetch policy combining timeout and retry configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchPolicy {
    pub timeout: TimeoutConfig,
    pub retry: RetryPolicy,
}

impl FetchPolicy {
    pub fn new(timeout: TimeoutConfig, retry: RetryPolicy) -> Self {
        Self { timeout, retry }
    }

    /// Defaults for `endpoint`. Only GET requests are retried.
    pub fn for_endpoint(endpoint: Endpoint, method: &Method) -> Self {
        let retry = if *method == Method::GET {
            RetryPolicy::new(endpoint.default_max_retries())
        } else {
            RetryPolicy::none()
        };
        Self {
            timeout: TimeoutConfig::from_total(endpoint.default_timeout()),
            retry,
        }
    }

    /// Apply the configured `[fetch]` section on top of the endpoint defaults.
    ///
    /// Endpoints that never retry keep doing so.
    pub fn with_config(mut self, config: &FetchConfig) -> Self {
        self.timeout = TimeoutConfig::new(config.connect_timeout(), config.timeout());
        if self.retry.max_retries > 0 {
            self.retry.max_retries = config.max_retries;
        }
        self
    }
}

/// Storefront backend client.
///
/// Cloning is cheap: the transport and cache are shared. Per-request state
/// (cookie, request id, metrics) is attached to a clone.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn Transport>,
    default_headers: BTreeMap<String, String>,
    fetch: Option<FetchConfig>,
    cache: Option<Arc<RevalidateCache>>,
    metrics: Option<Arc<Mutex<MetricsCollector>>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("default_headers", &self.default_headers.keys().collect::<Vec<_>>())
            .field("fetch", &self.fetch)
            .field("cached", &self.cache.is_some())
            .finish()
    }
}

impl ApiClient {
    /// Create a client for `base_url` over `transport`.
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        let mut default_headers = BTreeMap::new();
        default_headers.insert("Content-Type".to_string(), "application/json".to_string());
        default_headers.insert("Accept".to_string(), "application/json".to_string());

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            transport,
            default_headers,
            fetch: None,
            cache: None,
            metrics: None,
        }
    }

    /// Build an HTTP client from configuration.
    pub fn from_config(config: &StorefrontConfig) -> Result<Self, FetchError> {
        let transport = HttpTransport::new(config.fetch.connect_timeout())?;
        let mut client = Self::new(config.api.base_url.clone(), Arc::new(transport))
            .with_fetch_config(config.fetch.clone())
            .with_cache(Arc::new(RevalidateCache::with_capacity(
                config.api.revalidate(),
                config.api.cache_max_entries,
            )));
        if let Some(token) = config.api.csrf_token.as_deref() {
            client = client.with_csrf_token(token);
        }
        Ok(client)
    }

    pub fn with_fetch_config(mut self, fetch: FetchConfig) -> Self {
        self.fetch = Some(fetch);
        self
    }

    pub fn with_cache(mut self, cache: Arc<RevalidateCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Send `X-CSRFToken` on every request.
    pub fn with_csrf_token(self, token: &str) -> Self {
        self.with_default_header(CSRF_HEADER, token)
    }

    /// Forward the visitor's session cookie. Cookie-bearing reads bypass the cache.
    pub fn with_cookie(self, cookie: &str) -> Self {
        self.with_default_header("Cookie", cookie)
    }

    /// Propagate the request id to the backend.
    pub fn with_request_id(self, request_id: &RequestId) -> Self {
        self.with_default_header(REQUEST_ID_HEADER, request_id.as_str())
    }

    /// Record every fetch into `metrics`.
    pub fn with_metrics(mut self, metrics: Arc<Mutex<MetricsCollector>>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn with_default_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        let path = path.trim_start_matches('/');
        format!("{}/{}", self.base_url, path)
    }

    /// Start a request with the default headers applied.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.default_headers
            .iter()
            .fold(RequestBuilder::new(method, self.url(path)), |builder, (k, v)| {
                builder.header(k.clone(), v.clone())
            })
    }

    /// Effective policy for a request.
    pub fn policy(&self, endpoint: Endpoint, method: &Method) -> FetchPolicy {
        let policy = FetchPolicy::for_endpoint(endpoint, method);
        match &self.fetch {
            Some(fetch) => policy.with_config(fetch),
            None => policy,
        }
    }

    /// Send a request, applying timeout, retries and the cache.
    ///
    /// Non-2xx responses are returned as [`FetchError::Http`].
    pub async fn send(&self, endpoint: Endpoint, request: Request) -> Result<Response, FetchError> {
        let url = request.full_url();
        let cacheable =
            request.is_get() && endpoint.is_cacheable() && request.header("Cookie").is_none();

        if cacheable {
            if let Some(hit) = self.cache.as_ref().and_then(|cache| cache.get(&url)) {
                tracing::debug!(%endpoint, %url, "served from cache");
                self.record(
                    DependencyMetrics::ok(endpoint.name(), &url, Duration::ZERO, hit.status).from_cache(),
                );
                return Ok(hit);
            }
        }

        let policy = self.policy(endpoint, &request.method);
        let started = Instant::now();
        let mut attempt = 0u32;

        let result = loop {
            tracing::debug!(%endpoint, method = %request.method, %url, attempt, "fetching");

            let outcome = match tokio::time::timeout(policy.timeout.total, self.transport.send(&request)).await {
                Ok(Ok(response)) => response.error_for_status(),
                Ok(Err(error)) => Err(error),
                Err(_) => Err(FetchError::Timeout {
                    url: url.clone(),
                    after: policy.timeout.total,
                }),
            };

            match outcome {
                Err(error) if policy.retry.should_retry(&error, attempt) => {
                    let delay = policy.retry.backoff.delay_for_attempt(attempt);
                    tracing::debug!(%endpoint, %url, attempt, %error, ?delay, "retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                other => break other,
            }
        };

        let elapsed = started.elapsed();
        match &result {
            Ok(response) => {
                tracing::debug!(
                    %endpoint,
                    %url,
                    status = response.status,
                    bytes = response.body.len(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "fetched"
                );
                if cacheable {
                    if let Some(cache) = &self.cache {
                        cache.put(&url, response);
                    }
                }
                self.record(
                    DependencyMetrics::ok(endpoint.name(), &url, elapsed, response.status)
                        .with_retries(attempt),
                );
            }
            Err(error) => {
                tracing::debug!(%endpoint, %url, %error, attempts = attempt + 1, "fetch failed");
                let mut metrics =
                    DependencyMetrics::failed(endpoint.name(), &url, elapsed, error.to_string())
                        .with_retries(attempt);
                if let Some(status) = error.status() {
                    metrics = metrics.with_status(status);
                }
                self.record(metrics);
            }
        }

        result
    }

    /// `GET` a path and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        path: &str,
        query: &[(&str, Option<&str>)],
    ) -> Result<T, FetchError> {
        let request = query
            .iter()
            .fold(self.request(Method::GET, path), |builder, (key, value)| {
                builder.query_opt(key, *value)
            })
            .build();
        self.send(endpoint, request).await?.json()
    }

    /// Send a JSON body and decode the JSON reply.
    pub async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, FetchError> {
        let request = self.request(method, path).json(body)?.build();
        self.send(endpoint, request).await?.json()
    }

    /// Send a bodiless request and ignore the reply body.
    pub async fn send_empty(&self, endpoint: Endpoint, method: Method, path: &str) -> Result<(), FetchError> {
        let request = self.request(method, path).build();
        self.send(endpoint, request).await.map(|_| ())
    }

    fn record(&self, metrics: DependencyMetrics) {
        if let Some(collector) = &self.metrics {
            if let Ok(mut collector) = collector.lock() {
                collector.record_dependency(metrics);
            }
        }
    }
}
