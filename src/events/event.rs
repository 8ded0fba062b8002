//! # Events emitted by the retry controller and the timeout guard.
//!
//! [`EventKind`] classifies events into two groups:
//! - **Retry events**: attempt flow and the stop decision
//! - **Deadline events**: arming, expiry and disarming of a deadline
//!
//! The [`Event`] struct carries the metadata (label, attempt, flags, durations).
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use attemptguard::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::DeadlineExceeded)
//!     .with_label("fetch")
//!     .with_timeout(Duration::from_secs(3));
//!
//! assert_eq!(ev.kind, EventKind::DeadlineExceeded);
//! assert_eq!(ev.label.as_deref(), Some("fetch"));
//! assert_eq!(ev.timeout_ms, Some(3000));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

use crate::outcome::Outcome;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Retry events ===
    /// An attempt is about to run.
    ///
    /// Sets: `label`, `attempt`
    AttemptStarting,

    /// An attempt produced a valid outcome.
    ///
    /// Sets: `label`, `attempt`, `must_repeat`, `best_repeat`
    AttemptFinished,

    /// An attempt returned a malformed outcome; the call fails.
    ///
    /// Sets: `label`, `attempt`, `reason`
    OutcomeRejected,

    /// Another attempt will run.
    ///
    /// Sets: `label`, `attempt` (the one just finished), `reason` (continue reason),
    /// `delay_ms` (only when a backoff is configured)
    RepeatScheduled,

    /// The loop stopped; the last outcome is returned.
    ///
    /// Sets: `label`, `attempt` (total attempts), `reason` (stop reason)
    RepeatStopped,

    // === Deadline events ===
    /// A deadline was armed right before the guarded computation started.
    ///
    /// Sets: `label`, `timeout_ms`
    DeadlineArmed,

    /// The deadline elapsed before the computation finished.
    ///
    /// Sets: `label`, `timeout_ms`
    DeadlineExceeded,

    /// The deadline was disarmed (published on every exit path).
    ///
    /// Sets: `label`, `timeout_ms`, `elapsed_ms`
    DeadlineDisarmed,

    /// A parent cancellation token fired before the work finished.
    ///
    /// Sets: `label`, `attempt` (retry only)
    Canceled,
}

/// Event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Caller-supplied name of the guarded computation.
    pub label: Option<Arc<str>>,
    /// Attempt number (starting from 1).
    pub attempt: Option<u32>,
    /// Deadline in milliseconds (compact).
    pub timeout_ms: Option<u32>,
    /// Time spent under the deadline in milliseconds.
    pub elapsed_ms: Option<u32>,
    /// Delay before the next attempt in milliseconds.
    pub delay_ms: Option<u32>,
    /// `must_repeat` flag of the attempt's outcome.
    pub must_repeat: Option<bool>,
    /// `best_repeat` flag of the attempt's outcome.
    pub best_repeat: Option<bool>,
    /// Human-readable reason (stop/continue label, shape error, ...).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            label: None,
            attempt: None,
            timeout_ms: None,
            elapsed_ms: None,
            delay_ms: None,
            must_repeat: None,
            best_repeat: None,
            reason: None,
        }
    }

    #[inline]
    pub fn with_label(mut self, label: impl Into<Arc<str>>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Attaches the label if there is one.
    #[inline]
    pub fn with_label_opt(mut self, label: Option<&Arc<str>>) -> Self {
        self.label = label.cloned();
        self
    }

    #[inline]
    pub fn with_attempt(mut self, n: u32) -> Self {
        self.attempt = Some(n);
        self
    }

    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a deadline (stored as milliseconds).
    #[inline]
    pub fn with_timeout(mut self, d: Duration) -> Self {
        self.timeout_ms = Some(compact_ms(d));
        self
    }

    /// Attaches the elapsed time (stored as milliseconds).
    #[inline]
    pub fn with_elapsed(mut self, d: Duration) -> Self {
        self.elapsed_ms = Some(compact_ms(d));
        self
    }

    /// Attaches a delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        self.delay_ms = Some(compact_ms(d));
        self
    }

    /// Copies both repeat flags from an outcome.
    #[inline]
    pub fn with_flags<T>(mut self, outcome: &Outcome<T>) -> Self {
        self.must_repeat = Some(outcome.must_repeat);
        self.best_repeat = Some(outcome.best_repeat);
        self
    }

    #[inline]
    pub fn is_deadline(&self) -> bool {
        matches!(
            self.kind,
            EventKind::DeadlineArmed | EventKind::DeadlineExceeded | EventKind::DeadlineDisarmed
        )
    }
}

fn compact_ms(d: Duration) -> u32 {
    d.as_millis().min(u128::from(u32::MAX)) as u32
}
