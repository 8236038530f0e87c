//! Rate limit detection
//!
//! Classifies raw responses as rate limited (HTTP 429) and extracts the
//! server's `Retry-After` hint. Only the numeric-seconds form of the header
//! is understood; HTTP dates fall back to [`DEFAULT_RETRY_AFTER`].

use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::StatusCode;
use std::time::Duration;

/// Wait used when a 429 carries no usable `Retry-After` value
pub const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(60);

/// Returns true if the status signals rate limiting
pub fn is_rate_limited(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS
}

/// Extract the `Retry-After` wait from response headers.
///
/// Header lookup is case-insensitive. Missing, non-numeric, negative or
/// NaN values yield [`DEFAULT_RETRY_AFTER`]; out-of-range values saturate
/// to `Duration::MAX`.
pub fn extract_retry_after(headers: &HeaderMap) -> Duration {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_seconds)
        .unwrap_or(DEFAULT_RETRY_AFTER)
}

/// Classify a response: `Some(wait)` when rate limited, `None` otherwise
pub fn rate_limit_hint(status: StatusCode, headers: &HeaderMap) -> Option<Duration> {
    is_rate_limited(status).then(|| extract_retry_after(headers))
}

/// Values too large for a `Duration`, including `inf`, saturate so the
/// wait ceiling still rejects them.
fn parse_seconds(raw: &str) -> Option<Duration> {
    let seconds: f64 = raw.trim().parse().ok()?;
    if seconds.is_nan() || seconds < 0.0 {
        return None;
    }
    Some(Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX))
}
