//! Backend response handling.

use std::collections::HashMap;

use serde::de::DeserializeOwned;

use crate::FetchError;

/// An HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    /// URL the response was fetched from, for error messages.
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, headers: HashMap<String, String>, body: Vec<u8>) -> Self {
        Self {
            status,
            url: String::new(),
            headers,
            body,
        }
    }

    /// A JSON response with status `status`.
    pub fn json_body(status: u16, body: impl Into<Vec<u8>>) -> Self {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        Self::new(status, headers, body.into())
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Check if the response was successful (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Check if the response was a server error (5xx status).
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }

    /// Get the response body as text.
    pub fn text(&self) -> Result<String, FetchError> {
        String::from_utf8(self.body.clone()).map_err(|e| FetchError::Deserialization {
            url: self.url.clone(),
            message: format!("invalid UTF-8: {}", e),
        })
    }

    /// Parse the response body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        serde_json::from_slice(&self.body).map_err(|e| FetchError::Deserialization {
            url: self.url.clone(),
            message: e.to_string(),
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// Get a header value (case-insensitive).
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Convert to a Result, returning an error for non-2xx status codes.
    pub fn error_for_status(self) -> Result<Self, FetchError> {
        if self.is_success() {
            return Ok(self);
        }

        let mut message = String::from_utf8_lossy(&self.body).into_owned();
        if message.len() > 200 {
            let cut = (0..=200).rev().find(|i| message.is_char_boundary(*i)).unwrap_or(0);
            message.truncate(cut);
        }
        Err(FetchError::Http {
            status: self.status,
            url: self.url,
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_response(status: u16, body: &[u8]) -> Response {
        Response::new(status, HashMap::new(), body.to_vec()).with_url("http://api.test/x")
    }

    #[test]
    fn test_status_classes() {
        assert!(make_response(200, b"").is_success());
        assert!(make_response(299, b"").is_success());
        assert!(!make_response(300, b"").is_success());
        assert!(make_response(503, b"").is_server_error());
        assert!(!make_response(404, b"").is_server_error());
    }

    #[test]
    fn test_json_decoding() {
        #[derive(serde::Deserialize, Debug, PartialEq)]
        struct Data {
            value: i32,
        }

        let data: Data = make_response(200, br#"{"value": 42}"#).json().unwrap();
        assert_eq!(data, Data { value: 42 });

        let err = make_response(200, b"<html>").json::<Data>().unwrap_err();
        assert!(matches!(err, FetchError::Deserialization { ref url, .. } if url == "http://api.test/x"));
    }

    #[test]
    fn test_header_case_insensitive() {
        let resp = Response::json_body(200, "{}");
        assert_eq!(resp.header("content-type"), Some("application/json"));
        assert_eq!(resp.header("X-Missing"), None);
    }

    #[test]
    fn test_error_for_status() {
        assert!(make_response(200, b"OK").error_for_status().is_ok());

        let err = make_response(404, b"Not Found").error_for_status().unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_error_message_is_truncated() {
        let body = "ব".repeat(200);
        let err = make_response(500, body.as_bytes()).error_for_status().unwrap_err();
        match err {
            FetchError::Http { message, .. } => assert!(message.len() <= 200),
            other => panic!("unexpected {other:?}"),
        }
    }
}
