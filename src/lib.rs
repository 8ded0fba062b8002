//! # attemptguard
//!
//! Two execution-control combinators for a unit of work:
//!
//! - [`RetryController`] repeats a computation until its self-reported
//!   [`Outcome`] is good enough or a hard attempt cap is reached.
//! - [`TimeoutGuard`] aborts a computation that runs longer than its deadline
//!   and reports [`GuardError::DeadlineExceeded`] instead of a result.
//!
//! They share no state and compose in either order.
//!
//! ## Architecture
//! ```text
//!          caller
//!            │  retry(policy, f) / with_timeout(d, f)
//!            ▼
//! ┌─────────────────────────┐        ┌─────────────────────────────┐
//! │ RetryController         │        │ TimeoutGuard                │
//! │  - RepeatPolicy.decide  │        │  - Deadline (per call)      │
//! │  - BackoffPolicy (opt.) │        │  - tokio::time::timeout_at  │
//! │  - cancel token (opt.)  │        │  - CancellationToken        │
//! └───────────┬─────────────┘        └──────────────┬──────────────┘
//!             │ publish (optional)                  │ publish (optional)
//!             └──────────────► Bus ◄────────────────┘
//!                               │
//!                               ▼
//!                         SubscriberSet ──► Subscribe::on_event (LogWriter, ...)
//! ```
//!
//! ## Termination rule
//! After attempt `k` the retry loop stops if any of:
//! ```text
//! k > must_stop
//! k > best_stop && !must_repeat
//! k < best_stop && !must_repeat && !best_repeat
//! ```
//! and returns the outcome of attempt `k`.
//!
//! ## Features
//! | Area              | Description                                              | Key types                                  |
//! |-------------------|----------------------------------------------------------|--------------------------------------------|
//! | **Retry**         | Conditional repetition with soft window and hard cap.    | [`RetryController`], [`RepeatPolicy`]     |
//! | **Timeout**       | Per-call deadline with cooperative + forced cancellation.| [`TimeoutGuard`], [`Deadline`]             |
//! | **Outcomes**      | Typed or JSON attempt records, validated on receipt.     | [`Outcome`], [`IntoOutcome`]               |
//! | **Errors**        | Combinator failures folded into the caller's error.      | [`GuardError`]                             |
//! | **Events**        | Opt-in structured events over a broadcast bus.           | [`Bus`], [`Event`], [`Subscribe`]          |
//! | **Configuration** | One place for thresholds, deadline and backoff.          | [`Config`]                                 |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use attemptguard::{GuardError, Outcome, RepeatPolicy, retry, with_timeout};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), GuardError> {
//!     // A time-bounded attempt, retried until the value is acceptable.
//!     let mut seed = 0u32;
//!     let last = retry(RepeatPolicy::default(), || {
//!         seed += 7;
//!         let n = seed % 10;
//!         with_timeout(Duration::from_secs(1), move |_token| async move {
//!             Ok::<_, GuardError>(
//!                 Outcome::new(n).with_must_repeat(n > 5).with_best_repeat(n != 1),
//!             )
//!         })
//!     })
//!     .await?;
//!
//!     // 7 is rejected, 4 is improvable, 1 is accepted inside the soft window.
//!     assert_eq!(last.payload, 1);
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod events;
mod outcome;
mod policies;
mod retry;
mod subscribers;
mod timeout;

// ---- Public re-exports ----

pub use config::Config;
pub use error::GuardError;
pub use events::{Bus, Event, EventKind};
pub use outcome::{IntoOutcome, Outcome, ShapeError};
pub use policies::{BackoffPolicy, ContinueReason, JitterPolicy, RepeatPolicy, StopReason, Verdict};
pub use retry::{RetryController, retry, retry_blocking};
pub use subscribers::{Subscribe, SubscriberSet};
pub use timeout::{Deadline, TimeoutGuard, with_timeout, with_timeout_blocking};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
