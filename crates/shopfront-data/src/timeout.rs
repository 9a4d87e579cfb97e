//! Timeout configuration for backend fetches.

use std::time::Duration;

/// Timeout configuration for a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutConfig {
    /// Connection establishment; applied by the HTTP transport.
    pub connect: Duration,
    /// Whole attempt, from send to fully read body.
    pub total: Duration,
}

impl TimeoutConfig {
    pub fn new(connect: Duration, total: Duration) -> Self {
        Self { connect, total }
    }

    /// Derive the connect timeout from the total.
    pub fn from_total(total: Duration) -> Self {
        Self {
            connect: total / 4,
            total,
        }
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect: Duration::from_millis(2000),
            total: Duration::from_millis(5000),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_total() {
        let t = TimeoutConfig::from_total(Duration::from_secs(4));
        assert_eq!(t.connect, Duration::from_secs(1));
        assert_eq!(t.total, Duration::from_secs(4));
    }
}
