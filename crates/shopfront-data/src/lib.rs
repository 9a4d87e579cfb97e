//! Backend API client for the storefront.
//!
//! Every outbound call is tagged with an [`Endpoint`], which selects its
//! timeout, retry budget and cacheability:
//!
//! - [`ApiClient`] - Base URL, default headers, timeout/retry loop, cache
//! - [`StorefrontApi`] - Typed calls for catalog, site content, cart, orders
//! - [`RevalidateCache`] - Per-URL cache of successful reads
//! - [`Transport`] - `reqwest` in production, in-memory in tests
//! - [`loader`] - Fail-soft server-side loaders
//!
//! # Example
//!
//! ```rust,ignore
//! use shopfront_data::{ApiClient, StorefrontApi};
//!
//! let api = StorefrontApi::new(ApiClient::from_config(&config)?);
//! let tree = api.category_tree().await?;
//! ```

mod api;
mod cache;
mod client;
mod endpoint;
mod error;
pub mod loader;
pub mod media;
mod request;
mod response;
mod retry;
mod timeout;
mod transport;

pub use api::{decode_list, StorefrontApi};
pub use cache::{RevalidateCache, DEFAULT_REVALIDATE};
pub use client::{ApiClient, FetchPolicy, CSRF_HEADER};
pub use endpoint::Endpoint;
pub use error::FetchError;
pub use request::{Method, Request, RequestBuilder};
pub use response::Response;
pub use retry::{BackoffStrategy, RetryCondition, RetryPolicy};
pub use timeout::TimeoutConfig;
pub use transport::{HttpTransport, InMemoryTransport, Transport};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::loader::{fetch_categories_tree, fetch_homepage_data, fetch_site_settings};
    pub use crate::media::image_url;
    pub use crate::{ApiClient, Endpoint, FetchError, StorefrontApi};
}
