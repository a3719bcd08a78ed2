//! Retry policy for the retry-capable provider.

use std::time::Duration;

use filedrop_core::constants::DEFAULT_MAX_RETRIES;

/// Explicit retry policy: attempt count plus backoff schedule.
///
/// Kept as its own object so the upload routine can be exercised in tests
/// with a zero-delay schedule instead of real waits.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_retries: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay: Duration::from_secs(1),
        }
    }

    /// Override the backoff unit; `Duration::ZERO` disables waiting.
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Same schedule with a different attempt budget.
    pub fn for_attempts(&self, max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay: self.base_delay,
        }
    }

    /// Additional attempts after the first failure.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Exponential backoff: `base_delay * 2^attempt`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES)
    }
}
