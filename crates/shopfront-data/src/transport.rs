//! Transports that actually move requests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::request::{Method, Request};
use crate::response::Response;
use crate::FetchError;

/// Sends one request and returns the raw response.
///
/// Timeouts, retries and caching live in [`crate::ApiClient`]; a transport
/// only maps the exchange onto [`Response`] / [`FetchError`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &Request) -> Result<Response, FetchError>;
}

/// HTTP transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with the given connect timeout.
    pub fn new(connect_timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .user_agent(concat!("shopfront/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Request(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &Request) -> Result<Response, FetchError> {
        let url = request.full_url();
        let mut builder = self.client.request(request.method.clone(), &url);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(|e| map_reqwest_error(&url, e))?;

        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.to_string(), v.to_string())))
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| map_reqwest_error(&url, e))?
            .to_vec();

        Ok(Response::new(status, headers, body).with_url(url))
    }
}

fn map_reqwest_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_builder() {
        FetchError::Request(format!("{}: {}", url, error))
    } else {
        FetchError::Connection(format!("{}: {}", url, error))
    }
}

type Route = (Method, String);

/// In-memory transport answering from canned responses.
///
/// Routes match on method and full URL (query included). Each route holds a
/// queue; the last queued answer repeats. Unknown routes answer `404`.
#[derive(Debug, Default)]
pub struct InMemoryTransport {
    routes: Mutex<HashMap<Route, VecDeque<Result<Response, FetchError>>>>,
    sent: Mutex<Vec<Request>>,
    delay: Option<Duration>,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every answer, for exercising timeouts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue an answer for `method url`.
    pub fn on(&self, method: Method, url: &str, answer: Result<Response, FetchError>) -> &Self {
        if let Ok(mut routes) = self.routes.lock() {
            routes
                .entry((method, url.to_string()))
                .or_default()
                .push_back(answer);
        }
        self
    }

    /// Queue a JSON `200` for `GET url`.
    pub fn get_json(&self, url: &str, body: &str) -> &Self {
        self.on(Method::GET, url, Ok(Response::json_body(200, body)))
    }

    /// Queue a bare status for `GET url`.
    pub fn get_status(&self, url: &str, status: u16) -> &Self {
        self.on(Method::GET, url, Ok(Response::json_body(status, "")))
    }

    /// Requests sent so far.
    pub fn sent(&self) -> Vec<Request> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }

    /// Number of requests sent to `url` (query included).
    pub fn hits(&self, url: &str) -> usize {
        self.sent().iter().filter(|r| r.full_url() == url).count()
    }
}

#[async_trait]
impl Transport for InMemoryTransport {
    async fn send(&self, request: &Request) -> Result<Response, FetchError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let url = request.full_url();
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(request.clone());
        }

        let answer = match self.routes.lock() {
            Ok(mut routes) => routes
                .get_mut(&(request.method.clone(), url.clone()))
                .and_then(|queue| {
                    if queue.len() > 1 {
                        queue.pop_front()
                    } else {
                        queue.front().cloned()
                    }
                }),
            Err(_) => None,
        };

        answer
            .unwrap_or_else(|| Ok(Response::json_body(404, r#"{"detail":"Not found."}"#)))
            .map(|response| response.with_url(url))
    }
}
