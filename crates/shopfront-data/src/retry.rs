//! Retry policies for backend fetches.

use std::time::Duration;

use crate::FetchError;

/// Backoff strategy between retry attempts.
#[derive(Debug, Clone, PartialEq)]
pub enum BackoffStrategy {
    /// No delay between retries.
    None,
    /// Fixed delay between retries.
    Fixed(Duration),
    /// Exponential backoff with base and max.
    Exponential { base: Duration, max: Duration },
}

impl BackoffStrategy {
    /// Delay before retry number `attempt` (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        match self {
            Self::None => Duration::ZERO,
            Self::Fixed(d) => *d,
            Self::Exponential { base, max } => {
                let multiplier = 2u32.saturating_pow(attempt);
                std::cmp::min(base.saturating_mul(multiplier), *max)
            }
        }
    }
}

impl Default for BackoffStrategy {
    fn default() -> Self {
        Self::Exponential {
            base: Duration::from_millis(100),
            max: Duration::from_millis(1000),
        }
    }
}

/// Conditions that trigger a retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryCondition {
    /// Retry on a specific HTTP status code.
    StatusCode(u16),
    /// Retry on any 5xx status.
    ServerError,
    Timeout,
    ConnectionError,
}

impl RetryCondition {
    /// Check if an error matches this condition.
    pub fn matches(&self, error: &FetchError) -> bool {
        match (self, error) {
            (Self::StatusCode(code), FetchError::Http { status, .. }) => status == code,
            (Self::ServerError, FetchError::Http { status, .. }) => (500..600).contains(status),
            (Self::Timeout, FetchError::Timeout { .. }) => true,
            (Self::ConnectionError, FetchError::Connection(_)) => true,
            _ => false,
        }
    }
}

/// Retry policy configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of retries after the first attempt.
    pub max_retries: u32,
    pub backoff: BackoffStrategy,
    pub retry_on: Vec<RetryCondition>,
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            backoff: BackoffStrategy::default(),
            retry_on: vec![
                RetryCondition::ServerError,
                RetryCondition::Timeout,
                RetryCondition::ConnectionError,
            ],
        }
    }

    /// A policy with no retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            backoff: BackoffStrategy::None,
            retry_on: Vec::new(),
        }
    }

    /// Whether `error` on attempt number `attempt` (0-indexed) should be retried.
    pub fn should_retry(&self, error: &FetchError, attempt: u32) -> bool {
        attempt < self.max_retries && self.retry_on.iter().any(|c| c.matches(error))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: u16) -> FetchError {
        FetchError::Http {
            status,
            url: "u".into(),
            message: String::new(),
        }
    }

    #[test]
    fn test_exponential_backoff_is_capped() {
        let backoff = BackoffStrategy::Exponential {
            base: Duration::from_millis(100),
            max: Duration::from_millis(500),
        };
        assert_eq!(backoff.delay_for_attempt(0), Duration::from_millis(100));
        assert_eq!(backoff.delay_for_attempt(2), Duration::from_millis(400));
        assert_eq!(backoff.delay_for_attempt(3), Duration::from_millis(500));
        assert_eq!(backoff.delay_for_attempt(40), Duration::from_millis(500));
    }

    #[test]
    fn test_retries_server_errors_not_client_errors() {
        let policy = RetryPolicy::new(2);
        assert!(policy.should_retry(&http(502), 0));
        assert!(policy.should_retry(&http(502), 1));
        assert!(!policy.should_retry(&http(502), 2));
        assert!(!policy.should_retry(&http(404), 0));
        assert!(!policy.should_retry(&FetchError::Request("bad".into()), 0));
        assert!(policy.should_retry(&FetchError::Connection("reset".into()), 0));
    }

    #[test]
    fn test_none_never_retries() {
        let policy = RetryPolicy::none();
        assert!(!policy.should_retry(&http(500), 0));
        assert!(!policy.should_retry(
            &FetchError::Timeout {
                url: "u".into(),
                after: Duration::from_secs(1)
            },
            0
        ));
    }
}
