//! Retry policy configuration

use std::time::Duration;

/// Immutable retry parameters shared by every call a client issues.
///
/// The policy is plain data. Callers are expected to keep
/// `max_attempts >= 1` and `backoff_multiplier >= 1.0`; nothing here
/// rejects other values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts per call, shared between timeouts and rate limits
    pub max_attempts: u32,
    /// First timeout backoff
    pub initial_backoff: Duration,
    /// Growth factor applied to the backoff after each timeout
    pub backoff_multiplier: f64,
    /// Longest server-requested wait the client will honor
    pub max_retry_after: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_secs(1),
            backoff_multiplier: 2.0,
            max_retry_after: Duration::from_secs(300),
        }
    }
}

impl RetryPolicy {
    /// Create a policy from all four parameters
    pub fn new(
        max_attempts: u32,
        initial_backoff: Duration,
        backoff_multiplier: f64,
        max_retry_after: Duration,
    ) -> Self {
        Self {
            max_attempts,
            initial_backoff,
            backoff_multiplier,
            max_retry_after,
        }
    }

    /// A policy that makes exactly one attempt
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Set the attempt budget
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the exponential backoff schedule
    #[must_use]
    pub fn with_backoff(mut self, initial: Duration, multiplier: f64) -> Self {
        self.initial_backoff = initial;
        self.backoff_multiplier = multiplier;
        self
    }

    /// Set the rate-limit wait ceiling
    #[must_use]
    pub fn with_max_retry_after(mut self, max_retry_after: Duration) -> Self {
        self.max_retry_after = max_retry_after;
        self
    }

    /// Backoff to use after the one that was just slept.
    ///
    /// Saturates at `Duration::MAX` instead of overflowing.
    pub fn next_backoff(&self, current: Duration) -> Duration {
        Duration::try_from_secs_f64(current.as_secs_f64() * self.backoff_multiplier)
            .unwrap_or(Duration::MAX)
    }
}
