//! Request lifecycle tracking.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Lifecycle phases for a page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecyclePhase {
    /// Request received, processing started.
    Start,
    /// All backend fetches have settled.
    DataLoaded,
    /// HTML has been rendered.
    Rendered,
    /// Request completed successfully.
    Completion,
    /// An error occurred.
    Error(String),
}

impl LifecyclePhase {
    pub fn as_str(&self) -> &str {
        match self {
            LifecyclePhase::Start => "start",
            LifecyclePhase::DataLoaded => "data_loaded",
            LifecyclePhase::Rendered => "rendered",
            LifecyclePhase::Completion => "completion",
            LifecyclePhase::Error(_) => "error",
        }
    }
}

/// Timing context for observability.
#[derive(Debug, Clone)]
pub struct TimingContext {
    start: Instant,
    marks: HashMap<String, Instant>,
}

impl TimingContext {
    /// Create a new timing context.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            marks: HashMap::new(),
        }
    }

    /// Record a timing mark.
    pub fn mark(&mut self, name: &str) {
        self.marks.insert(name.to_string(), Instant::now());
    }

    /// Record reaching a lifecycle phase.
    pub fn mark_phase(&mut self, phase: &LifecyclePhase) {
        self.mark(phase.as_str());
    }

    /// Get elapsed time since start.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Time from start until `phase` was marked.
    pub fn time_to(&self, phase: &LifecyclePhase) -> Option<Duration> {
        self.marks
            .get(phase.as_str())
            .map(|t| t.duration_since(self.start))
    }
}

impl Default for TimingContext {
    fn default() -> Self {
        Self::new()
    }
}
