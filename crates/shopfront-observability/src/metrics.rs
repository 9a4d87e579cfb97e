//! Per-request timing metrics.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use shopfront_core::RequestId;

/// Response header carrying dependency timings to the browser.
pub const SERVER_TIMING_HEADER: &str = "server-timing";

/// Metrics for a single request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestMetrics {
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workload: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    /// Time until every backend fetch settled (microseconds).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_to_data_us: Option<u64>,
    /// Rendered sections keyed by name.
    pub sections: BTreeMap<String, SectionMetrics>,
    /// Backend fetches in the order they were recorded.
    pub dependencies: Vec<DependencyMetrics>,
    pub total_duration_us: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

/// Metrics for a single rendered section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionMetrics {
    pub name: String,
    /// Rendered size in bytes.
    pub bytes: usize,
    /// Whether the section rendered its error or empty state.
    pub used_fallback: bool,
}

/// Metrics for a backend fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyMetrics {
    /// Endpoint tag, e.g. `homepage` or `categories`.
    pub tag: String,
    pub url: String,
    pub duration_us: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    /// Number of retries after the first attempt.
    pub retry_count: u32,
    pub success: bool,
    /// Served from the revalidation cache.
    #[serde(default)]
    pub cached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DependencyMetrics {
    /// A successful fetch.
    pub fn ok(tag: impl Into<String>, url: impl Into<String>, duration: Duration, status: u16) -> Self {
        Self {
            tag: tag.into(),
            url: url.into(),
            duration_us: duration.as_micros() as u64,
            status_code: Some(status),
            retry_count: 0,
            success: true,
            cached: false,
            error: None,
        }
    }

    /// A failed fetch.
    pub fn failed(
        tag: impl Into<String>,
        url: impl Into<String>,
        duration: Duration,
        error: impl Into<String>,
    ) -> Self {
        Self {
            tag: tag.into(),
            url: url.into(),
            duration_us: duration.as_micros() as u64,
            status_code: None,
            retry_count: 0,
            success: false,
            cached: false,
            error: Some(error.into()),
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status_code = Some(status);
        self
    }

    pub fn with_retries(mut self, retry_count: u32) -> Self {
        self.retry_count = retry_count;
        self
    }

    pub fn from_cache(mut self) -> Self {
        self.cached = true;
        self
    }
}

/// Collector for request metrics.
#[derive(Debug)]
pub struct MetricsCollector {
    request_id: RequestId,
    workload: Option<String>,
    route: Option<String>,
    start: Instant,
    data_loaded: Option<Instant>,
    sections: BTreeMap<String, SectionMetrics>,
    dependencies: Vec<DependencyMetrics>,
}

impl MetricsCollector {
    pub fn new(request_id: RequestId) -> Self {
        Self {
            request_id,
            workload: None,
            route: None,
            start: Instant::now(),
            data_loaded: None,
            sections: BTreeMap::new(),
            dependencies: Vec::new(),
        }
    }

    pub fn set_workload(&mut self, workload: impl Into<String>) {
        self.workload = Some(workload.into());
    }

    pub fn set_route(&mut self, route: impl Into<String>) {
        self.route = Some(route.into());
    }

    /// Record that every backend fetch has settled.
    pub fn record_data_loaded(&mut self) {
        self.data_loaded = Some(Instant::now());
    }

    /// Record a rendered section.
    pub fn record_section(&mut self, name: &str, bytes: usize, used_fallback: bool) {
        self.sections.insert(
            name.to_string(),
            SectionMetrics {
                name: name.to_string(),
                bytes,
                used_fallback,
            },
        );
    }

    /// Record a dependency fetch.
    pub fn record_dependency(&mut self, metrics: DependencyMetrics) {
        self.dependencies.push(metrics);
    }

    pub fn dependencies(&self) -> &[DependencyMetrics] {
        &self.dependencies
    }

    /// Number of failed dependency fetches so far.
    pub fn failed_dependencies(&self) -> usize {
        self.dependencies.iter().filter(|d| !d.success).count()
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Value for the `Server-Timing` response header.
    ///
    /// One metric per dependency plus a trailing `total`. Failed fetches carry
    /// `desc="error"`, cache hits `desc="cache"`.
    pub fn server_timing_header(&self) -> String {
        let mut parts: Vec<String> = self
            .dependencies
            .iter()
            .map(|dep| {
                let mut part = format!(
                    "{};dur={:.1}",
                    timing_token(&dep.tag),
                    dep.duration_us as f64 / 1000.0
                );
                if !dep.success {
                    part.push_str(";desc=\"error\"");
                } else if dep.cached {
                    part.push_str(";desc=\"cache\"");
                }
                part
            })
            .collect();

        parts.push(format!(
            "total;dur={:.1}",
            self.elapsed().as_micros() as f64 / 1000.0
        ));
        parts.join(", ")
    }

    /// Finalize and return the metrics.
    pub fn finalize(self, status_code: Option<u16>) -> RequestMetrics {
        let time_to_data_us = self
            .data_loaded
            .map(|t| t.duration_since(self.start).as_micros() as u64);

        RequestMetrics {
            request_id: self.request_id.to_string(),
            workload: self.workload,
            route: self.route,
            time_to_data_us,
            sections: self.sections,
            dependencies: self.dependencies,
            total_duration_us: self.start.elapsed().as_micros() as u64,
            status_code,
        }
    }
}

fn timing_token(tag: &str) -> String {
    tag.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

impl RequestMetrics {
    /// Format as JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Format as human-readable summary.
    pub fn to_summary(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Request: {}", self.request_id));

        if let Some(ttd) = self.time_to_data_us {
            lines.push(format!("  Time to data: {}us ({:.2}ms)", ttd, ttd as f64 / 1000.0));
        }

        lines.push(format!(
            "  Total: {}us ({:.2}ms)",
            self.total_duration_us,
            self.total_duration_us as f64 / 1000.0
        ));

        if !self.dependencies.is_empty() {
            lines.push("  Dependencies:".to_string());
            for dep in &self.dependencies {
                let status = if dep.success {
                    format!("{}", dep.status_code.unwrap_or(0))
                } else {
                    "FAILED".to_string()
                };
                lines.push(format!(
                    "    {} [{}]: {}us ({:.2}ms) - {}",
                    dep.tag,
                    status,
                    dep.duration_us,
                    dep.duration_us as f64 / 1000.0,
                    dep.url
                ));
            }
        }

        if !self.sections.is_empty() {
            lines.push("  Sections:".to_string());
            for (name, section) in &self.sections {
                let fallback = if section.used_fallback { " [fallback]" } else { "" };
                lines.push(format!("    {}: {} bytes{}", name, section.bytes, fallback));
            }
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_timing_lists_dependencies_then_total() {
        let mut metrics = MetricsCollector::new(RequestId::from_string("r"));
        metrics.record_dependency(DependencyMetrics::ok(
            "homepage",
            "http://api/api/homepage/",
            Duration::from_micros(12_300),
            200,
        ));
        metrics.record_dependency(
            DependencyMetrics::failed(
                "categories",
                "http://api/api/categories/",
                Duration::from_millis(4),
                "timeout",
            )
            .with_retries(1),
        );
        metrics.record_dependency(
            DependencyMetrics::ok("site settings", "http://api/x", Duration::ZERO, 200).from_cache(),
        );

        let header = metrics.server_timing_header();
        assert!(header.starts_with("homepage;dur=12.3, categories;dur=4.0;desc=\"error\", "));
        assert!(header.contains("site_settings;dur=0.0;desc=\"cache\""));
        assert!(header.contains(", total;dur="));
        assert_eq!(metrics.failed_dependencies(), 1);
    }

    #[test]
    fn test_finalize_keeps_order_and_sections() {
        let mut metrics = MetricsCollector::new(RequestId::from_string("r-2"));
        metrics.set_workload("homepage");
        metrics.set_route("/");
        metrics.record_dependency(DependencyMetrics::ok("a", "u1", Duration::ZERO, 200));
        metrics.record_dependency(DependencyMetrics::ok("b", "u2", Duration::ZERO, 200));
        metrics.record_data_loaded();
        metrics.record_section("hot", 512, false);
        metrics.record_section("category:men", 80, true);

        let done = metrics.finalize(Some(200));
        assert_eq!(done.request_id, "r-2");
        assert_eq!(done.workload.as_deref(), Some("homepage"));
        let tags: Vec<_> = done.dependencies.iter().map(|d| d.tag.as_str()).collect();
        assert_eq!(tags, vec!["a", "b"]);
        assert!(done.time_to_data_us.is_some());
        assert!(done.sections["category:men"].used_fallback);

        let summary = done.to_summary();
        assert!(summary.contains("Request: r-2"));
        assert!(summary.contains("category:men: 80 bytes [fallback]"));
    }
}
