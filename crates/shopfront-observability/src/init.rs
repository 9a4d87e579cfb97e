//! Global subscriber installation.

use shopfront_core::LogFormat;
use tracing_subscriber::{
    fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
    EnvFilter,
};

/// Environment variable that overrides the configured filter.
pub const FILTER_ENV: &str = "RUST_LOG";

/// Errors raised while setting up observability.
#[derive(Debug, thiserror::Error)]
pub enum ObservabilityError {
    #[error("invalid log filter '{directive}': {message}")]
    InvalidFilter { directive: String, message: String },

    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(String),
}

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG`, when set and valid, replaces `level`. Output goes to stderr so
/// that commands printing JSON on stdout stay machine readable.
pub fn init_tracing(format: LogFormat, level: &str) -> Result<(), ObservabilityError> {
    let filter = build_filter(level, std::env::var(FILTER_ENV).ok().as_deref())?;

    let fmt_layer = match format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .compact()
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|err| ObservabilityError::Subscriber(err.to_string()))
}

/// Resolve the effective filter. A malformed override falls back to `level`.
pub fn build_filter(level: &str, env_override: Option<&str>) -> Result<EnvFilter, ObservabilityError> {
    if let Some(directive) = env_override.filter(|d| !d.trim().is_empty()) {
        if let Ok(filter) = EnvFilter::try_new(directive) {
            return Ok(filter);
        }
    }

    EnvFilter::try_new(level).map_err(|err| ObservabilityError::InvalidFilter {
        directive: level.to_string(),
        message: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_level_is_used() {
        let filter = build_filter("shopfront_data=debug,info", None).unwrap();
        assert!(filter.to_string().to_lowercase().contains("shopfront_data=debug"));
    }

    #[test]
    fn test_env_override_wins() {
        let filter = build_filter("info", Some("warn")).unwrap();
        assert_eq!(filter.to_string().to_lowercase(), "warn");
    }

    #[test]
    fn test_bad_override_falls_back() {
        let filter = build_filter("info", Some("shopfront=loud")).unwrap();
        assert_eq!(filter.to_string().to_lowercase(), "info");
    }

    #[test]
    fn test_bad_level_is_an_error() {
        let err = build_filter("shopfront=loud", None).unwrap_err();
        assert!(matches!(err, ObservabilityError::InvalidFilter { .. }));
    }
}
