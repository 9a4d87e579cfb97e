//! Storefront HTTP server.
//!
//! The `shopfront` binary lives in `main.rs`; the router is exposed here so
//! it can be driven in-process.

pub mod server;
