//! Core abstractions for the storefront.
//!
//! This crate provides the fundamental types shared by every other crate:
//! - `StorefrontConfig` - Runtime configuration and discovery
//! - `RequestContext` - Typed request parameters
//! - `TimingContext` / `LifecyclePhase` - Request lifecycle tracking

mod config;
mod context;
mod lifecycle;

pub use config::*;
pub use context::*;
pub use lifecycle::*;
