//! Retry engine
//!
//! Wraps single request attempts in a bounded retry loop.
//!
//! # Behavior
//!
//! - **Rate limits (429)**: wait exactly the server's `Retry-After` hint,
//!   or abort immediately when the hint exceeds the policy ceiling
//! - **Timeouts**: exponential backoff that only grows within one call
//! - **Everything else**: surfaced after the first attempt, never retried
//!
//! Rate-limit waits and timeout backoffs draw from the same attempt budget.

mod orchestrator;
mod outcome;
mod policy;

pub use orchestrator::{
    run_with_retry, CancellableSleeper, Phase, RetryState, Sleeper, TokioSleeper, Transition,
};
pub use outcome::Outcome;
pub use policy::RetryPolicy;
