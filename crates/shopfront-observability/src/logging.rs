//! Request-scoped structured logging on top of `tracing`.

use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, Instant};

use serde::Serialize;
use shopfront_core::RequestId;

/// Log level for structured logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trace => write!(f, "TRACE"),
            Self::Debug => write!(f, "DEBUG"),
            Self::Info => write!(f, "INFO"),
            Self::Warn => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// A structured log entry.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Request ID for correlation.
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workload: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    /// Additional structured fields, ordered by key.
    #[serde(flatten)]
    pub fields: BTreeMap<String, serde_json::Value>,
    /// Microseconds since the logger was created.
    pub elapsed_us: u64,
}

impl LogEntry {
    /// Extra fields rendered as `key=value` pairs.
    pub fn fields_display(&self) -> String {
        self.fields
            .iter()
            .map(|(k, v)| match v {
                serde_json::Value::String(s) => format!("{}={}", k, s),
                other => format!("{}={}", k, other),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Format as JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.message.clone())
    }
}

/// Structured logger with request context.
///
/// Every entry carries the request id, and the workload and route when
/// set, so that lines from concurrent requests can be told apart. Entries
/// are emitted as `tracing` events under the `shopfront::request` target.
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    request_id: RequestId,
    workload: Option<String>,
    route: Option<String>,
    start_time: Instant,
    min_level: LogLevel,
}

macro_rules! emit_event {
    ($level:expr, $entry:expr) => {{
        let entry = $entry;
        let fields = entry.fields_display();
        tracing::event!(
            target: "shopfront::request",
            $level,
            request_id = %entry.request_id,
            workload = entry.workload.as_deref(),
            route = entry.route.as_deref(),
            elapsed_us = entry.elapsed_us,
            fields = %fields,
            "{}",
            entry.message
        );
    }};
}

impl StructuredLogger {
    /// Create a new logger with request context.
    pub fn new(request_id: RequestId) -> Self {
        Self {
            request_id,
            workload: None,
            route: None,
            start_time: Instant::now(),
            min_level: LogLevel::Debug,
        }
    }

    /// Set the workload name.
    pub fn with_workload(mut self, workload: impl Into<String>) -> Self {
        self.workload = Some(workload.into());
        self
    }

    /// Set the route path.
    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    /// Set minimum log level.
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message, BTreeMap::new());
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message, BTreeMap::new());
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message, BTreeMap::new());
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message, BTreeMap::new());
    }

    /// Build the entry that would be logged, or `None` below the minimum level.
    pub fn entry(
        &self,
        level: LogLevel,
        message: &str,
        fields: BTreeMap<String, serde_json::Value>,
    ) -> Option<LogEntry> {
        if level < self.min_level {
            return None;
        }

        Some(LogEntry {
            level,
            message: message.to_string(),
            request_id: self.request_id.to_string(),
            workload: self.workload.clone(),
            route: self.route.clone(),
            fields,
            elapsed_us: self.elapsed_us(),
        })
    }

    fn log(&self, level: LogLevel, message: &str, fields: BTreeMap<String, serde_json::Value>) {
        let Some(entry) = self.entry(level, message, fields) else {
            return;
        };

        match level {
            LogLevel::Trace => emit_event!(tracing::Level::TRACE, entry),
            LogLevel::Debug => emit_event!(tracing::Level::DEBUG, entry),
            LogLevel::Info => emit_event!(tracing::Level::INFO, entry),
            LogLevel::Warn => emit_event!(tracing::Level::WARN, entry),
            LogLevel::Error => emit_event!(tracing::Level::ERROR, entry),
        }
    }

    pub fn request_id(&self) -> &RequestId {
        &self.request_id
    }

    /// Microseconds since logger creation.
    pub fn elapsed_us(&self) -> u64 {
        self.start_time.elapsed().as_micros() as u64
    }

    /// Start building an info log entry.
    pub fn info_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Info, message)
    }

    /// Start building a warn log entry.
    pub fn warn_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Warn, message)
    }

    /// Start building an error log entry.
    pub fn error_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Error, message)
    }

    /// Start building a debug log entry.
    pub fn debug_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Debug, message)
    }
}

/// Builder for log entries with fluent API.
pub struct LogBuilder<'a> {
    logger: &'a StructuredLogger,
    level: LogLevel,
    message: String,
    fields: BTreeMap<String, serde_json::Value>,
}

impl<'a> LogBuilder<'a> {
    pub fn new(logger: &'a StructuredLogger, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            logger,
            level,
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Add a string field.
    pub fn field(mut self, key: &str, value: impl Into<String>) -> Self {
        self.fields
            .insert(key.to_string(), serde_json::json!(value.into()));
        self
    }

    /// Add an integer field.
    pub fn field_i64(mut self, key: &str, value: i64) -> Self {
        self.fields.insert(key.to_string(), serde_json::json!(value));
        self
    }

    /// Add a boolean field.
    pub fn field_bool(mut self, key: &str, value: bool) -> Self {
        self.fields.insert(key.to_string(), serde_json::json!(value));
        self
    }

    /// Add a duration field (in milliseconds).
    pub fn duration_ms(mut self, key: &str, duration: Duration) -> Self {
        self.fields
            .insert(key.to_string(), serde_json::json!(duration.as_millis() as u64));
        self
    }

    /// The entry this builder would emit.
    pub fn build(&self) -> Option<LogEntry> {
        self.logger.entry(self.level, &self.message, self.fields.clone())
    }

    /// Emit the log entry.
    pub fn emit(self) {
        self.logger.log(self.level, &self.message, self.fields);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logger() -> StructuredLogger {
        StructuredLogger::new(RequestId::from_string("req-1"))
            .with_workload("homepage")
            .with_route("/")
    }

    #[test]
    fn test_entry_carries_request_context() {
        let entry = logger()
            .info_builder("page rendered")
            .field("section", "hot")
            .field_i64("status", 200)
            .build()
            .unwrap();

        assert_eq!(entry.request_id, "req-1");
        assert_eq!(entry.workload.as_deref(), Some("homepage"));
        assert_eq!(entry.route.as_deref(), Some("/"));
        assert_eq!(entry.fields_display(), "section=hot status=200");
    }

    #[test]
    fn test_min_level_filters_entries() {
        let logger = logger().with_min_level(LogLevel::Warn);
        assert!(logger.debug_builder("noise").build().is_none());
        assert!(logger.error_builder("boom").build().is_some());
    }

    #[test]
    fn test_json_flattens_fields() {
        let entry = logger()
            .warn_builder("fetch failed")
            .field_bool("fallback", true)
            .duration_ms("took", Duration::from_millis(12))
            .build()
            .unwrap();

        let json: serde_json::Value = serde_json::from_str(&entry.to_json()).unwrap();
        assert_eq!(json["level"], "warn");
        assert_eq!(json["fallback"], true);
        assert_eq!(json["took"], 12);
        assert_eq!(json["route"], "/");
    }

    #[test]
    fn test_emit_without_subscriber_is_silent() {
        logger().info_builder("no subscriber installed").emit();
        logger().error("still fine");
    }
}
