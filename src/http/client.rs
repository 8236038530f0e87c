//! Figma API client
//!
//! Provides an HTTP client that handles:
//! - Single request attempts classified into [`Outcome`]s
//! - Rate limit detection via `Retry-After`
//! - Retries with exponential backoff for timeouts
//! - Cancellation of in-flight attempts and waits

use super::rate_limit::rate_limit_hint;
use crate::endpoint::{Endpoint, JsonEndpoint, RawResponse, RequestSpec};
use crate::error::{Error, Result};
use crate::retry::{run_with_retry, CancellableSleeper, Outcome, RetryPolicy, TokioSleeper};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Response;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Base URL of the Figma REST API
pub const FIGMA_API_BASE_URL: &str = "https://api.figma.com/v1/";

/// Header Figma reads personal access tokens from
pub const FIGMA_TOKEN_HEADER: &str = "X-Figma-Token";

/// Configuration for the client
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL for all requests
    pub base_url: String,
    /// Access token sent on every request
    pub access_token: Option<String>,
    /// Header carrying the access token
    pub auth_header: String,
    /// Transport timeout for each individual attempt
    pub timeout: Duration,
    /// Default retry policy for `request_with_retry`
    pub retry: RetryPolicy,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: FIGMA_API_BASE_URL.to_string(),
            access_token: None,
            auth_header: FIGMA_TOKEN_HEADER.to_string(),
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
            default_headers: HashMap::new(),
            user_agent: format!("figma-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Defaults for the public Figma API with a personal access token
    pub fn figma(access_token: impl Into<String>) -> Self {
        Self::builder().access_token(access_token).build()
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("auth_header", &self.auth_header)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .field("default_headers", &self.default_headers)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Builder for client config
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the access token
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.config.access_token = Some(token.into());
        self
    }

    /// Set the header the access token is sent in
    pub fn auth_header(mut self, name: impl Into<String>) -> Self {
        self.config.auth_header = name.into();
        self
    }

    /// Set the per-attempt timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the default retry policy
    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.config.retry = policy;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

/// Figma API client.
///
/// Cheap to clone; clones share the connection pool and the immutable
/// configuration, so concurrent calls need no locking.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    config: Arc<ClientConfig>,
    base_url: Url,
}

impl Client {
    /// Create a client from configuration
    pub fn new(config: ClientConfig) -> Result<Self> {
        let base_url = parse_base_url(&config.base_url)?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .default_headers(default_headers(&config)?)
            .build()?;

        Ok(Self {
            http,
            config: Arc::new(config),
            base_url,
        })
    }

    /// Create a client for the public Figma API
    pub fn figma(access_token: impl Into<String>) -> Result<Self> {
        Self::new(ClientConfig::figma(access_token))
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the default retry policy
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.config.retry
    }

    /// Send exactly one attempt and classify what came back.
    ///
    /// Never sleeps or retries. Expected failures are reported as
    /// [`Outcome`] variants instead of errors.
    pub async fn execute_once<E: Endpoint>(&self, endpoint: &E) -> Outcome<E::Content> {
        let response = match self.send(endpoint.request()).await {
            Ok(response) => response,
            Err(outcome) => return outcome,
        };

        let status = response.status();
        if let Some(retry_after) = rate_limit_hint(status, response.headers()) {
            return Outcome::RateLimited { retry_after };
        }

        let headers = response.headers().clone();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => return self.transport_failure(e),
        };

        endpoint
            .decode(&RawResponse {
                status,
                headers,
                body,
            })
            .into()
    }

    /// Single attempt, no retry
    pub async fn request<E: Endpoint>(&self, endpoint: &E) -> Result<E::Content> {
        self.execute_once(endpoint).await.into_result()
    }

    /// Retry with the client's default policy
    pub async fn request_with_retry<E: Endpoint>(&self, endpoint: &E) -> Result<E::Content> {
        self.request_with_policy(endpoint, &self.config.retry).await
    }

    /// Retry with an explicit policy
    pub async fn request_with_policy<E: Endpoint>(
        &self,
        endpoint: &E,
        policy: &RetryPolicy,
    ) -> Result<E::Content> {
        run_with_retry(policy, &TokioSleeper, |_| self.execute_once(endpoint)).await
    }

    /// Retry with an explicit policy until `token` is cancelled.
    ///
    /// Cancellation interrupts both the in-flight attempt and any wait, and
    /// fails the call with [`Error::Cancelled`].
    pub async fn request_with_retry_cancellable<E: Endpoint>(
        &self,
        endpoint: &E,
        policy: &RetryPolicy,
        token: &CancellationToken,
    ) -> Result<E::Content> {
        let sleeper = CancellableSleeper::new(token.clone());
        run_with_retry(policy, &sleeper, |_| async move {
            tokio::select! {
                biased;
                () = token.cancelled() => Outcome::Failed(Error::Cancelled),
                outcome = self.execute_once(endpoint) => outcome,
            }
        })
        .await
    }

    /// GET a path and deserialize the JSON body, retrying per the default policy
    pub async fn get_json<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned + Send,
    {
        self.request_with_retry(&JsonEndpoint::<T>::get(path)).await
    }

    /// Build full URL from path
    pub fn build_url(&self, path: &str) -> Result<Url> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Ok(Url::parse(path)?);
        }
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    async fn send<T>(&self, spec: RequestSpec) -> std::result::Result<Response, Outcome<T>> {
        let url = self.build_url(&spec.path).map_err(Outcome::Failed)?;
        let mut req = self.http.request(spec.method, url);

        for (key, value) in &spec.headers {
            req = req.header(key.as_str(), value.as_str());
        }

        if !spec.query.is_empty() {
            req = req.query(&spec.query);
        }

        if let Some(ref body) = spec.body {
            req = req.json(body);
        }

        req.send().await.map_err(|e| self.transport_failure(e))
    }

    fn transport_failure<T>(&self, err: reqwest::Error) -> Outcome<T> {
        if err.is_timeout() {
            Outcome::Timeout {
                timeout: self.config.timeout,
            }
        } else {
            Outcome::Failed(Error::Http(err))
        }
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

/// Parse the base URL so relative paths join beneath it
fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn default_headers(config: &ClientConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    for (key, value) in &config.default_headers {
        headers.insert(header_name(key)?, header_value(key, value)?);
    }

    if let Some(ref token) = config.access_token {
        let mut value = header_value(&config.auth_header, token)?;
        value.set_sensitive(true);
        headers.insert(header_name(&config.auth_header)?, value);
    }

    Ok(headers)
}

fn header_name(name: &str) -> Result<HeaderName> {
    HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| Error::config(format!("invalid header name '{name}': {e}")))
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| Error::config(format!("invalid value for header '{name}': {e}")))
}
