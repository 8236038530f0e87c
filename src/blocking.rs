//! Blocking adapter
//!
//! Wraps the async [`Client`] for callers without a runtime. Each call
//! blocks the current thread on a private current-thread runtime, so it
//! must not be used from inside an async context.

use crate::endpoint::Endpoint;
use crate::error::Result;
use crate::http::{Client, ClientConfig};
use crate::retry::RetryPolicy;
use tokio::runtime::{Builder, Runtime};

/// Synchronous front end over [`Client`]
#[derive(Debug)]
pub struct BlockingClient {
    inner: Client,
    runtime: Runtime,
}

impl BlockingClient {
    /// Create a blocking client from configuration
    pub fn new(config: ClientConfig) -> Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        let inner = Client::new(config)?;
        Ok(Self { inner, runtime })
    }

    /// Get the underlying async client
    pub fn inner(&self) -> &Client {
        &self.inner
    }

    /// Single attempt, no retry
    pub fn request<E: Endpoint>(&self, endpoint: &E) -> Result<E::Content> {
        self.runtime.block_on(self.inner.request(endpoint))
    }

    /// Retry with the client's default policy
    pub fn request_with_retry<E: Endpoint>(&self, endpoint: &E) -> Result<E::Content> {
        self.runtime.block_on(self.inner.request_with_retry(endpoint))
    }

    /// Retry with an explicit policy
    pub fn request_with_policy<E: Endpoint>(
        &self,
        endpoint: &E,
        policy: &RetryPolicy,
    ) -> Result<E::Content> {
        self.runtime
            .block_on(self.inner.request_with_policy(endpoint, policy))
    }
}
