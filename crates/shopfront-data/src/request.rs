//! Outbound request builder.

use std::collections::BTreeMap;

pub use http::Method;
use serde::Serialize;

use crate::FetchError;

/// A fully built outbound request.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    /// Absolute URL without the query string.
    pub url: String,
    /// Query pairs, in insertion order.
    pub query: Vec<(String, String)>,
    /// Headers keyed by their canonical name.
    pub headers: BTreeMap<String, String>,
    pub body: Option<Vec<u8>>,
}

impl Request {
    /// URL including the encoded query string.
    pub fn full_url(&self) -> String {
        if self.query.is_empty() {
            return self.url.clone();
        }

        let query = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.url, query)
    }

    /// Get a header value (case-insensitive).
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub fn is_get(&self) -> bool {
        self.method == Method::GET
    }
}

/// A builder for constructing requests.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    request: Request,
}

impl RequestBuilder {
    /// Create a new request builder.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            request: Request {
                method,
                url: url.into(),
                query: Vec::new(),
                headers: BTreeMap::new(),
                body: None,
            },
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    /// Add a header, replacing any previous value with the same name.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        self.request
            .headers
            .retain(|existing, _| !existing.eq_ignore_ascii_case(&key));
        self.request.headers.insert(key, value.into());
        self
    }

    /// Add a query pair.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.query.push((key.into(), value.into()));
        self
    }

    /// Add a query pair only when `value` is present and not blank.
    pub fn query_opt(self, key: &str, value: Option<&str>) -> Self {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(v) => self.query(key, v),
            None => self,
        }
    }

    /// Set the request body as raw bytes.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.request.body = Some(body.into());
        self
    }

    /// Set the request body as JSON.
    pub fn json<T: Serialize>(self, value: &T) -> Result<Self, FetchError> {
        let json = serde_json::to_vec(value)?;
        Ok(self.content_type("application/json").body(json))
    }

    /// Set the Accept header.
    pub fn accept(self, content_type: impl Into<String>) -> Self {
        self.header("Accept", content_type)
    }

    /// Set the Content-Type header.
    pub fn content_type(self, content_type: impl Into<String>) -> Self {
        self.header("Content-Type", content_type)
    }

    pub fn build(self) -> Request {
        self.request
    }
}
