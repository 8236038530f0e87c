// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::needless_pass_by_value)]

//! # Figma Client
//!
//! An async client for the Figma REST API whose core is a retry-and-backoff
//! request engine.
//!
//! ## Features
//!
//! - **Rate Limit Handling**: HTTP 429 detection with `Retry-After` hints
//! - **Bounded Waits**: requests abort instead of waiting past a ceiling
//! - **Timeout Backoff**: exponential backoff that never resets mid-call
//! - **Cancellation**: retry loops stop on a `CancellationToken`
//! - **Blocking Adapter**: opt-in synchronous front end
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use figma_client::{Client, JsonEndpoint, Result};
//! use serde_json::Value;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = Client::figma("figd_...")?;
//!
//!     // One attempt
//!     let me: Value = client.request(&JsonEndpoint::get("me")).await?;
//!
//!     // Retries timeouts and honors Retry-After up to five minutes
//!     let file: Value = client
//!         .request_with_retry(&JsonEndpoint::get("files/FILE_KEY"))
//!         .await?;
//!
//!     println!("{} / {}", me["handle"], file["name"]);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! caller
//!   │ request_with_retry(endpoint)
//!   ▼
//! ┌──────────────────┐  Outcome   ┌──────────────────┐
//! │ retry loop       │◀───────────│ execute_once     │──▶ reqwest
//! │ (RetryPolicy,    │            │ (one attempt)    │
//! │  Sleeper)        │            └────────┬─────────┘
//! └──────────────────┘                     │ status + headers
//!                                          ▼
//!                                 ┌──────────────────┐
//!                                 │ rate_limit_hint  │
//!                                 └──────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the client
pub mod error;

/// Endpoint capability: request description plus decoder
pub mod endpoint;

/// HTTP client and rate limit detection
pub mod http;

/// Retry policy and retry loop
pub mod retry;

/// Blocking adapter over the async client
pub mod blocking;

/// Settings loaded from YAML and the environment
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use blocking::BlockingClient;
pub use endpoint::{Endpoint, JsonEndpoint, RawResponse, RequestSpec};
pub use error::{Error, Result};
pub use http::{Client, ClientConfig};
pub use retry::{Outcome, RetryPolicy};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
