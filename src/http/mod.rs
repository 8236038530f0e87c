//! HTTP module
//!
//! Provides the Figma API client and rate limit detection.
//!
//! # Features
//!
//! - **Single attempts**: one request, classified into an `Outcome`
//! - **Rate Limit Detection**: HTTP 429 with numeric `Retry-After` hints
//! - **Retries**: timeout backoff and server-directed waits
//! - **Cancellation**: `CancellationToken` aware retry loop

mod client;
mod rate_limit;

pub use client::{Client, ClientConfig, ClientConfigBuilder, FIGMA_API_BASE_URL, FIGMA_TOKEN_HEADER};
pub use rate_limit::{extract_retry_after, is_rate_limited, rate_limit_hint, DEFAULT_RETRY_AFTER};

#[cfg(test)]
mod tests;
