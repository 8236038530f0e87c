//! Retry loop
//!
//! `RetryState` is the per-call state machine; `run_with_retry` drives it,
//! sleeping between attempts through a [`Sleeper`].

use super::{Outcome, RetryPolicy};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Where a call currently is in the retry state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Attempting,
    WaitingBackoff,
    WaitingRateLimit,
    Succeeded,
    FailedTerminal,
}

/// What the loop should do after an attempt
#[derive(Debug)]
pub enum Transition<T> {
    /// Stop and hand this result to the caller
    Finish(Result<T>),
    /// Sleep for this long, then attempt again if the budget allows
    Wait(Duration),
}

/// Transient state owned by exactly one retrying call
#[derive(Debug)]
pub struct RetryState {
    pub attempt: u32,
    pub current_backoff: Duration,
    pub last_error: Option<Error>,
    pub phase: Phase,
}

impl RetryState {
    pub fn new(policy: &RetryPolicy) -> Self {
        Self {
            attempt: 0,
            current_backoff: policy.initial_backoff,
            last_error: None,
            phase: Phase::Attempting,
        }
    }

    pub fn has_attempts_left(&self, policy: &RetryPolicy) -> bool {
        self.attempt < policy.max_attempts
    }

    /// Feed one attempt's outcome into the state machine.
    ///
    /// Rate-limit waits use the server hint verbatim and leave the backoff
    /// untouched. A hint above `max_retry_after` finishes without waiting.
    pub fn advance<T>(&mut self, outcome: Outcome<T>, policy: &RetryPolicy) -> Transition<T> {
        match outcome {
            Outcome::Success(content) => {
                self.phase = Phase::Succeeded;
                Transition::Finish(Ok(content))
            }
            Outcome::RateLimited { retry_after } if retry_after > policy.max_retry_after => {
                self.phase = Phase::FailedTerminal;
                Transition::Finish(Err(Error::RateLimitExceeded { retry_after }))
            }
            Outcome::RateLimited { retry_after } => {
                self.phase = Phase::WaitingRateLimit;
                self.last_error = Some(Error::RateLimited { retry_after });
                self.attempt += 1;
                Transition::Wait(retry_after)
            }
            Outcome::Timeout { timeout } => {
                self.phase = Phase::WaitingBackoff;
                let delay = self.current_backoff;
                self.current_backoff = policy.next_backoff(delay);
                self.last_error = Some(Error::timeout(timeout));
                self.attempt += 1;
                Transition::Wait(delay)
            }
            Outcome::Failed(err) => {
                self.phase = Phase::FailedTerminal;
                Transition::Finish(Err(err))
            }
        }
    }

    /// Error to surface once the attempt budget is spent
    pub fn into_error(mut self) -> Error {
        self.phase = Phase::FailedTerminal;
        self.last_error
            .take()
            .unwrap_or_else(|| Error::timeout(Duration::ZERO))
    }
}

/// Waits between attempts
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Wait for `duration`, or fail if the wait was interrupted
    async fn sleep(&self, duration: Duration) -> Result<()>;
}

/// Uninterruptible sleep on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) -> Result<()> {
        tokio::time::sleep(duration).await;
        Ok(())
    }
}

/// Sleep that ends early with [`Error::Cancelled`] when the token fires
#[derive(Debug, Clone)]
pub struct CancellableSleeper {
    token: CancellationToken,
}

impl CancellableSleeper {
    pub fn new(token: CancellationToken) -> Self {
        Self { token }
    }
}

#[async_trait]
impl Sleeper for CancellableSleeper {
    async fn sleep(&self, duration: Duration) -> Result<()> {
        tokio::select! {
            biased;
            () = self.token.cancelled() => Err(Error::Cancelled),
            () = tokio::time::sleep(duration) => Ok(()),
        }
    }
}

/// Run `attempt` until it succeeds, fails terminally, or the policy's
/// attempt budget is spent.
///
/// `attempt` receives the zero-based attempt index. At most one attempt is
/// in flight at a time.
pub async fn run_with_retry<T, F, Fut, S>(
    policy: &RetryPolicy,
    sleeper: &S,
    mut attempt: F,
) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Outcome<T>>,
    S: Sleeper + ?Sized,
{
    let mut state = RetryState::new(policy);

    while state.has_attempts_left(policy) {
        state.phase = Phase::Attempting;
        debug!("Attempt {}/{}", state.attempt + 1, policy.max_attempts);
        let outcome = attempt(state.attempt).await;

        match state.advance(outcome, policy) {
            Transition::Finish(result) => {
                if state.phase == Phase::Succeeded {
                    debug!("Request succeeded on attempt {}", state.attempt + 1);
                }
                return result;
            }
            Transition::Wait(delay) => {
                if state.phase == Phase::WaitingRateLimit {
                    warn!(
                        "Rate limited by Figma API. Waiting {}s before retry {}/{}",
                        delay.as_secs(),
                        state.attempt,
                        policy.max_attempts
                    );
                } else {
                    warn!(
                        "Request timed out. Waiting {:?} before retry {}/{}",
                        delay, state.attempt, policy.max_attempts
                    );
                }
                sleeper.sleep(delay).await?;
            }
        }
    }

    Err(state.into_error())
}
