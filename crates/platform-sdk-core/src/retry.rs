// crates/platform-sdk-core/src/retry.rs
// ============================================================================
// Module: Retry Policy
// Description: Automatic retry configuration for service requests.
// Purpose: Decide which failures are retried and how long to wait between attempts.
// Dependencies: httpdate
// ============================================================================

//! ## Overview
//! Retries cover transport failures, `429 Too Many Requests`, and server
//! errors other than `501 Not Implemented`. Delays grow exponentially from
//! [`RetryPolicy::min_interval`] and never exceed
//! [`RetryPolicy::max_interval`]. A `Retry-After` header replaces the
//! computed delay but is still capped.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;
use std::time::SystemTime;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Retry attempts used when zero is requested.
pub const DEFAULT_MAX_RETRIES: u32 = 4;
/// Backoff ceiling used when zero is requested.
pub const DEFAULT_MAX_RETRY_INTERVAL: Duration = Duration::from_secs(30);
/// First backoff delay.
pub const DEFAULT_MIN_RETRY_INTERVAL: Duration = Duration::from_secs(1);

// ============================================================================
// SECTION: Policy
// ============================================================================

/// Retry configuration for a service client.
///
/// # Invariants
/// - `min_interval <= max_interval`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retries after the first attempt.
    max_retries: u32,
    /// Upper bound for any single delay.
    max_interval: Duration,
    /// Delay before the first retry.
    min_interval: Duration,
}

impl RetryPolicy {
    /// Builds a policy; zero values select the defaults.
    #[must_use]
    pub fn new(max_retries: u32, max_interval: Duration) -> Self {
        let max_retries = if max_retries == 0 { DEFAULT_MAX_RETRIES } else { max_retries };
        let max_interval =
            if max_interval.is_zero() { DEFAULT_MAX_RETRY_INTERVAL } else { max_interval };
        Self {
            max_retries,
            max_interval,
            min_interval: DEFAULT_MIN_RETRY_INTERVAL.min(max_interval),
        }
    }

    /// Overrides the first backoff delay, clamped to the ceiling.
    #[must_use]
    pub fn with_min_interval(mut self, min_interval: Duration) -> Self {
        self.min_interval = min_interval.min(self.max_interval);
        self
    }

    /// Returns the maximum number of retries.
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Returns the backoff ceiling.
    #[must_use]
    pub const fn max_interval(&self) -> Duration {
        self.max_interval
    }

    /// Returns the first backoff delay.
    #[must_use]
    pub const fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Returns true when a response with `status` should be retried.
    #[must_use]
    pub const fn is_retryable_status(status: u16) -> bool {
        status == 429 || (status >= 500 && status <= 599 && status != 501)
    }

    /// Returns the delay before retry number `attempt` (zero-based).
    #[must_use]
    pub fn backoff(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        if let Some(retry_after) = retry_after {
            return retry_after.min(self.max_interval);
        }
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.min_interval.checked_mul(factor).map_or(self.max_interval, |delay| {
            delay.min(self.max_interval)
        })
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES, DEFAULT_MAX_RETRY_INTERVAL)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses a `Retry-After` header value relative to `now`.
///
/// Accepts delta-seconds or an HTTP-date; dates in the past yield zero.
#[must_use]
pub fn parse_retry_after(value: &str, now: SystemTime) -> Option<Duration> {
    let trimmed = value.trim();
    if let Ok(secs) = trimmed.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }
    let at = httpdate::parse_http_date(trimmed).ok()?;
    Some(at.duration_since(now).unwrap_or_default())
}
