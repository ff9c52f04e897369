use std::time::Duration;

/// Retry budget and delays for one instrument fetch.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt (2 means 3 attempts in total).
    pub max_retries: u32,
    /// Wait before retrying after a quote failed validation.
    pub invalid_backoff: Duration,
    /// Wait before retrying after a transient source error.
    pub error_backoff: Duration,
    /// Upper bound for a single fetch-and-extract attempt.
    pub attempt_timeout: Duration,
}

impl RetryPolicy {
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            invalid_backoff: Duration::from_secs(3),
            error_backoff: Duration::from_secs(5),
            attempt_timeout: Duration::from_secs(45),
        }
    }
}
