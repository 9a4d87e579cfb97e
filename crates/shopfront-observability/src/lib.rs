//! Observability infrastructure for the storefront.
//!
//! This crate provides:
//! - `init_tracing` - Global `tracing` subscriber (pretty or JSON)
//! - `StructuredLogger` - Request-scoped logging with request id and route
//! - `MetricsCollector` - Backend fetch and section timings, `Server-Timing`

mod init;
mod logging;
mod metrics;

pub use init::*;
pub use logging::*;
pub use metrics::*;

// Re-export RequestId and TimingContext from shopfront-core for convenience
pub use shopfront_core::{LogFormat, RequestId, TimingContext};
