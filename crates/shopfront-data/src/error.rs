//! Fetch error types.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when talking to the backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Non-2xx response.
    #[error("HTTP {status} for {url}")]
    Http {
        status: u16,
        url: String,
        message: String,
    },

    /// The total timeout elapsed before a response arrived.
    #[error("timed out after {after:?} for {url}")]
    Timeout { url: String, after: Duration },

    /// Connecting or transferring failed.
    #[error("connection error: {0}")]
    Connection(String),

    /// The body did not decode into the expected shape.
    #[error("failed to decode response from {url}: {message}")]
    Deserialization { url: String, message: String },

    /// The request could not be built.
    #[error("request error: {0}")]
    Request(String),
}

impl FetchError {
    /// HTTP status, when the backend answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the error came from a 404.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Timeout { .. })
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Request(e.to_string())
    }
}
