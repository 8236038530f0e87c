//! Error types for the Figma client
//!
//! Every public API returns `Result<T, Error>` where Error is defined here.
//! The retry engine only ever handles `Timeout` and `RateLimited` locally;
//! every other variant is fatal to a call and surfaces unchanged.

use std::time::Duration;
use thiserror::Error;

/// The main error type for the Figma client
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Retry Engine Errors
    // ============================================================================
    /// A single attempt hit the transport timeout
    #[error("Request to Figma API timed out. Retrying...")]
    Timeout { timeout_ms: u64 },

    /// The server answered 429. Only surfaced by single-attempt requests.
    #[error("Rate limited by Figma API. Retrying in {} seconds...", .retry_after.as_secs())]
    RateLimited { retry_after: Duration },

    /// The server asked for a wait longer than the configured ceiling
    #[error(
        "Figma API rate limit exceeded. Retry-After: {} minutes. \
         Please wait and try again later, or check your API usage.",
        .retry_after.as_secs() / 60
    )]
    RateLimitExceeded { retry_after: Duration },

    #[error("Request cancelled")]
    Cancelled,

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Decoding Errors
    // ============================================================================
    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a timeout error for a transport timeout of the given length
    pub fn timeout(timeout: Duration) -> Self {
        Self::Timeout {
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Check if the retry engine would wait and try again after this error
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Timeout { .. } | Error::RateLimited { .. })
    }

    /// The server-requested wait carried by rate-limit errors
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Error::RateLimited { retry_after } | Error::RateLimitExceeded { retry_after } => {
                Some(*retry_after)
            }
            _ => None,
        }
    }
}

/// Result type alias for the Figma client
pub type Result<T> = std::result::Result<T, Error>;
