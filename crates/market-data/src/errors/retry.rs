use std::time::Duration;

/// Classification for retry policy.
///
/// Used by the coordinator to decide how long to wait before the next attempt.
///
/// # Behavior Summary
///
/// | Class | Retries while budget remains? | Delay before retry |
/// |-------|-------------------------------|--------------------|
/// | `WithBackoff` | Yes | error backoff |
/// | `Immediate` | Yes | none |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Transient failure of the page source: timeout, load failure, access
    /// denied, or the delivery channel being unavailable.
    WithBackoff,

    /// Unclassified failure. Retried only while the attempt budget remains,
    /// without waiting.
    Immediate,
}

impl RetryClass {
    /// Delay to apply before the next attempt, given the configured error backoff.
    pub fn delay(self, error_backoff: Duration) -> Duration {
        match self {
            Self::WithBackoff => error_backoff,
            Self::Immediate => Duration::ZERO,
        }
    }
}
