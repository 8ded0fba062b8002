//! Retry policies.
//!
//! ## Contents
//! - [`RepeatPolicy`] when the retry loop stops (soft window + hard cap)
//! - [`BackoffPolicy`] optional delay between attempts
//! - [`JitterPolicy`]  randomization of that delay
//!
//! ## Quick wiring
//! ```text
//! RetryController { policy: RepeatPolicy, backoff: Option<BackoffPolicy> }
//!      └─► after each attempt:
//!           - policy.decide(attempt, &outcome) → Stop / Continue
//!           - backoff.delay_after(attempt) before the next attempt
//! ```

mod backoff;
mod jitter;
mod repeat;

pub use backoff::BackoffPolicy;
pub use jitter::JitterPolicy;
pub use repeat::{ContinueReason, RepeatPolicy, StopReason, Verdict};
