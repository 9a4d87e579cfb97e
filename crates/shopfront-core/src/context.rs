//! Request context with typed parameters.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

pub use http::Method;

use crate::lifecycle::TimingContext;

/// Header carrying an upstream request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Unique request identifier for tracing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(pub String);

impl RequestId {
    /// Generate a new request ID.
    pub fn generate() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
        Self(format!("{:x}-{:04x}", nanos, seq & 0xffff))
    }

    /// Create from an existing ID string.
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// HTTP headers.
pub type Headers = HashMap<String, String>;

/// Typed request context passed to page handlers.
#[derive(Debug)]
pub struct RequestContext {
    /// Unique request identifier.
    pub request_id: RequestId,
    /// HTTP method.
    pub method: Method,
    /// Request path, without the query string.
    pub path: String,
    /// HTTP headers.
    pub headers: Headers,
    /// Timing context for observability.
    pub timing: TimingContext,
}

impl RequestContext {
    /// Create a new request context.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            request_id: RequestId::generate(),
            method,
            path: path.into(),
            headers: HashMap::new(),
            timing: TimingContext::new(),
        }
    }

    /// Create a GET context from a path that may carry a query string.
    pub fn get(uri: &str) -> Self {
        let path = uri.split_once('?').map_or(uri, |(path, _)| path);
        Self::new(Method::GET, path)
    }

    /// Add a header, adopting `x-request-id` when present.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        if name.eq_ignore_ascii_case(REQUEST_ID_HEADER) && !value.is_empty() {
            self.request_id = RequestId::from_string(value.clone());
        }
        self.headers.insert(name, value);
        self
    }

    /// Get a header value by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
