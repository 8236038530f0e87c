//! Classified result of a single request attempt

use crate::error::{Error, Result};
use std::time::Duration;

/// What one attempt produced.
///
/// Built by the request executor and consumed straight away by the retry
/// loop. The set of variants is closed; the loop matches on all of them.
#[derive(Debug)]
pub enum Outcome<T> {
    /// Response decoded into content
    Success(T),
    /// Transport timed out after `timeout`
    Timeout { timeout: Duration },
    /// Server answered 429 and asked us to wait `retry_after`
    RateLimited { retry_after: Duration },
    /// Anything else: transport failure, decode failure, bad status
    Failed(Error),
}

impl<T> Outcome<T> {
    /// Convert to a plain result without retrying
    pub fn into_result(self) -> Result<T> {
        match self {
            Outcome::Success(content) => Ok(content),
            Outcome::Timeout { timeout } => Err(Error::timeout(timeout)),
            Outcome::RateLimited { retry_after } => Err(Error::RateLimited { retry_after }),
            Outcome::Failed(err) => Err(err),
        }
    }
}

impl<T> From<Result<T>> for Outcome<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(content) => Outcome::Success(content),
            Err(err) => Outcome::Failed(err),
        }
    }
}
