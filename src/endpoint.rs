//! Endpoint capability
//!
//! An endpoint describes one API call: how to build the request and how to
//! turn the raw response into typed content. The client invokes it once per
//! attempt and never stores it beyond a single call.

use crate::error::{Error, Result};
use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

/// Transport-level description of a request
#[derive(Debug, Clone)]
pub struct RequestSpec {
    /// HTTP method
    pub method: Method,
    /// Path relative to the client's base URL, or an absolute URL
    pub path: String,
    /// Query parameters
    pub query: HashMap<String, String>,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Request body (JSON)
    pub body: Option<Value>,
}

impl RequestSpec {
    /// Create a request for a method and path
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: HashMap::new(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Create a GET request
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Create a POST request with a JSON body
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::POST, path).json(body)
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set JSON body
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// A fully read response
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RawResponse {
    /// Body as lossy UTF-8 text
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Fail with [`Error::HttpStatus`] unless the status is 2xx
    pub fn error_for_status(&self) -> Result<()> {
        if self.status.is_success() {
            Ok(())
        } else {
            Err(Error::http_status(self.status.as_u16(), self.text()))
        }
    }
}

/// One API call: a request description plus a pure decoder
pub trait Endpoint: Send + Sync {
    /// Typed result of a successful call
    type Content: Send;

    /// Describe the request to send
    fn request(&self) -> RequestSpec;

    /// Decode a non-rate-limited response
    fn decode(&self, response: &RawResponse) -> Result<Self::Content>;
}

/// Endpoint that deserializes a JSON body into `T`.
///
/// Non-2xx responses decode to [`Error::HttpStatus`].
pub struct JsonEndpoint<T> {
    spec: RequestSpec,
    _content: PhantomData<fn() -> T>,
}

impl<T> JsonEndpoint<T> {
    /// Wrap a request description
    pub fn new(spec: RequestSpec) -> Self {
        Self {
            spec,
            _content: PhantomData,
        }
    }

    /// GET endpoint for a path
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(RequestSpec::get(path))
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.spec = self.spec.query(key, value);
        self
    }
}

impl<T> fmt::Debug for JsonEndpoint<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonEndpoint")
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}

impl<T> Endpoint for JsonEndpoint<T>
where
    T: DeserializeOwned + Send,
{
    type Content = T;

    fn request(&self) -> RequestSpec {
        self.spec.clone()
    }

    fn decode(&self, response: &RawResponse) -> Result<T> {
        response.error_for_status()?;
        Ok(serde_json::from_slice(&response.body)?)
    }
}
