//! Quota hints carried by backend responses.
//!
//! Nothing here waits or retries. The quota is surfaced on every
//! [`Response`](crate::scm::Response) so callers can back off themselves.

use chrono::{DateTime, TimeDelta, Utc};
use http::HeaderMap;

/// Request quota reported through `X-RateLimit-Limit`,
/// `X-RateLimit-Remaining` and `X-RateLimit-Reset` (epoch seconds).
///
/// # Example
///
/// ```
/// use chrono::DateTime;
/// use forgekit::scm::RateLimitInfo;
///
/// let resets = DateTime::from_timestamp(1_700_000_060, 0).expect("valid timestamp");
/// let info = RateLimitInfo::new(5000, 0, resets);
/// let now = DateTime::from_timestamp(1_700_000_000, 0).expect("valid timestamp");
/// assert!(info.is_exhausted());
/// assert_eq!(info.retry_after(now).num_seconds(), 60);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitInfo {
    limit: u32,
    remaining: u32,
    reset: DateTime<Utc>,
}

impl RateLimitInfo {
    /// Quota with the given window size, requests left and reset instant.
    #[must_use]
    pub const fn new(limit: u32, remaining: u32, reset: DateTime<Utc>) -> Self {
        Self {
            limit,
            remaining,
            reset,
        }
    }

    /// Parses the quota headers. All three must be present and numeric.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let limit = header_value(headers, "x-ratelimit-limit")?;
        let remaining = header_value(headers, "x-ratelimit-remaining")?;
        let reset_secs: i64 = header_value(headers, "x-ratelimit-reset")?;
        let reset = DateTime::from_timestamp(reset_secs, 0)?;
        Some(Self::new(limit, remaining, reset))
    }

    /// Requests allowed per window.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Requests left in the current window.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// When the window resets.
    #[must_use]
    pub const fn reset(&self) -> DateTime<Utc> {
        self.reset
    }

    /// Returns true when no requests are left.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Time to wait from `now` until the window resets; zero once it has.
    #[must_use]
    pub fn retry_after(&self, now: DateTime<Utc>) -> TimeDelta {
        (self.reset - now).max(TimeDelta::zero())
    }
}

fn header_value<T: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers.get(name)?.to_str().ok()?.trim().parse().ok()
}
