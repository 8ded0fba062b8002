//! # RetryController: bounded conditional repetition.
//!
//! Runs a computation until its [`Outcome`] is good enough or the hard cap is
//! reached, and returns the outcome of the **last** attempt.
//!
//! ## Loop
//! ```text
//! loop {
//!   ├─► attempt += 1                          ──► AttemptStarting
//!   ├─► computation().await
//!   │       ├─ Err(e)           ──► return Err(e) (unchanged, never retried)
//!   │       └─ Ok(raw)
//!   ├─► raw.into_outcome()
//!   │       ├─ Err(shape)       ──► OutcomeRejected ──► return Err(InvalidOutcomeShape)
//!   │       └─ Ok(outcome)      ──► AttemptFinished
//!   ├─► policy.decide(attempt, &outcome)
//!   │       ├─ Stop(reason)     ──► RepeatStopped ──► return Ok(outcome)
//!   │       └─ Continue(reason) ──► RepeatScheduled
//!   └─► backoff sleep (optional, cancellable) / cancellation check
//! }
//! ```
//!
//! ## Rules
//! - The computation runs **at least once**; attempts never overlap.
//! - Only the last outcome is kept, even when an earlier one was better.
//! - The cancel token is checked between attempts and during backoff sleeps,
//!   never before the first attempt.
//! - Without a bus the controller has no side effects besides the computation.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::{select, time};
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error::GuardError;
use crate::events::{Bus, Event, EventKind};
use crate::outcome::{IntoOutcome, Outcome};
use crate::policies::{BackoffPolicy, RepeatPolicy, Verdict};

/// What the loop does after a validated attempt.
enum Step<T> {
    Done(Outcome<T>),
    Again(Option<Duration>),
}

/// Repeats a computation according to a [`RepeatPolicy`].
///
/// # Example
/// ```rust
/// use attemptguard::{GuardError, Outcome, RepeatPolicy, RetryController};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), GuardError> {
/// let mut calls = 0;
/// let last = RetryController::new(RepeatPolicy::default())
///     .run(|| {
///         calls += 1;
///         let n = calls;
///         async move { Ok::<_, GuardError>(Outcome::accept(n).with_must_repeat(n < 3)) }
///     })
///     .await?;
/// assert_eq!(last.payload, 3);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct RetryController {
    policy: RepeatPolicy,
    backoff: Option<BackoffPolicy>,
    label: Option<Arc<str>>,
    bus: Option<Bus>,
    cancel: Option<CancellationToken>,
}

impl RetryController {
    pub fn new(policy: RepeatPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Builds a controller from [`Config`] thresholds and backoff.
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            policy: cfg.repeat_policy(),
            backoff: cfg.backoff,
            ..Self::default()
        }
    }

    /// Waits between attempts according to `backoff`.
    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = Some(backoff);
        self
    }

    /// Names the computation in published events.
    pub fn with_label(mut self, label: impl Into<Arc<str>>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Publishes attempt events to `bus`.
    pub fn with_bus(mut self, bus: Bus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Stops the loop with [`GuardError::Canceled`] once `token` is cancelled.
    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn policy(&self) -> RepeatPolicy {
        self.policy
    }

    /// Runs an async computation until the policy says stop.
    ///
    /// Returns the last attempt's outcome. Errors from `computation` are
    /// returned unchanged; malformed outcomes fail with
    /// [`GuardError::InvalidOutcomeShape`].
    pub async fn run<F, Fut, R, E>(&self, mut computation: F) -> Result<Outcome<R::Payload>, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<R, E>>,
        R: IntoOutcome,
        E: From<GuardError>,
    {
        let mut attempt: u32 = 0;
        loop {
            attempt = attempt.saturating_add(1);
            self.publish(|| Event::new(EventKind::AttemptStarting).with_attempt(attempt));

            let raw = computation().await?;
            let delay = match self.settle(attempt, raw)? {
                Step::Done(outcome) => return Ok(outcome),
                Step::Again(delay) => delay,
            };

            match (delay, &self.cancel) {
                (Some(delay), Some(token)) => {
                    select! {
                        _ = time::sleep(delay) => {}
                        _ = token.cancelled() => return Err(self.canceled(attempt).into()),
                    }
                }
                (Some(delay), None) => time::sleep(delay).await,
                (None, _) => {}
            }
            if self.is_cancelled() {
                return Err(self.canceled(attempt).into());
            }
        }
    }

    /// Runs a blocking computation until the policy says stop.
    ///
    /// Same semantics as [`run`](Self::run); backoff delays block the thread.
    pub fn run_blocking<F, R, E>(&self, mut computation: F) -> Result<Outcome<R::Payload>, E>
    where
        F: FnMut() -> Result<R, E>,
        R: IntoOutcome,
        E: From<GuardError>,
    {
        let mut attempt: u32 = 0;
        loop {
            attempt = attempt.saturating_add(1);
            self.publish(|| Event::new(EventKind::AttemptStarting).with_attempt(attempt));

            let raw = computation()?;
            match self.settle(attempt, raw)? {
                Step::Done(outcome) => return Ok(outcome),
                Step::Again(Some(delay)) => std::thread::sleep(delay),
                Step::Again(None) => {}
            }
            if self.is_cancelled() {
                return Err(self.canceled(attempt).into());
            }
        }
    }

    /// Validates one attempt's value and applies the policy.
    fn settle<R: IntoOutcome>(
        &self,
        attempt: u32,
        raw: R,
    ) -> Result<Step<R::Payload>, GuardError> {
        let outcome = match raw.into_outcome() {
            Ok(outcome) => outcome,
            Err(shape) => {
                self.publish(|| {
                    Event::new(EventKind::OutcomeRejected)
                        .with_attempt(attempt)
                        .with_reason(shape.reason.as_str())
                });
                return Err(shape.at_attempt(attempt));
            }
        };
        self.publish(|| {
            Event::new(EventKind::AttemptFinished)
                .with_attempt(attempt)
                .with_flags(&outcome)
        });

        match self.policy.decide(attempt, &outcome) {
            Verdict::Stop(reason) => {
                self.publish(|| {
                    Event::new(EventKind::RepeatStopped)
                        .with_attempt(attempt)
                        .with_reason(reason.as_label())
                });
                Ok(Step::Done(outcome))
            }
            Verdict::Continue(reason) => {
                let delay = self
                    .backoff
                    .map(|b| b.delay_after(attempt))
                    .filter(|d| *d > Duration::ZERO);

                self.publish(|| {
                    let ev = Event::new(EventKind::RepeatScheduled)
                        .with_attempt(attempt)
                        .with_reason(reason.as_label());
                    match delay {
                        Some(d) => ev.with_delay(d),
                        None => ev,
                    }
                });
                Ok(Step::Again(delay))
            }
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|t| t.is_cancelled())
    }

    fn canceled(&self, attempt: u32) -> GuardError {
        self.publish(|| Event::new(EventKind::Canceled).with_attempt(attempt));
        GuardError::Canceled
    }

    /// Builds and sends an event only when a bus is attached.
    fn publish(&self, make: impl FnOnce() -> Event) {
        if let Some(bus) = &self.bus {
            bus.publish(make().with_label_opt(self.label.as_ref()));
        }
    }
}
