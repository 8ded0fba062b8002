//! # Outcome of one retried attempt.
//!
//! [`Outcome`] carries the two repeat-decision flags next to an opaque payload.
//!
//! | `must_repeat` | `best_repeat` | meaning                                         |
//! |---------------|---------------|-------------------------------------------------|
//! | `false`       | `false`       | fully acceptable                                |
//! | `false`       | `true`        | acceptable, could be improved (soft window)     |
//! | `true`        | any           | rejected, repetition is mandatory (up to cap)   |
//!
//! ## Example
//! ```rust
//! use attemptguard::Outcome;
//!
//! let o = Outcome::improvable(7);
//! assert!(!o.must_repeat);
//! assert!(o.best_repeat);
//! assert!(o.is_acceptable());
//! assert_eq!(o.into_payload(), 7);
//! ```

use serde::{Deserialize, Serialize};

/// Structured result of one attempt under [`RetryController`](crate::RetryController).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome<T> {
    /// Attempt is unacceptable; repetition is mandatory up to the hard cap.
    #[serde(default, alias = "mustRepeat")]
    pub must_repeat: bool,
    /// Attempt is acceptable but may improve; repetition only within the soft window.
    #[serde(default, alias = "bestRepeat")]
    pub best_repeat: bool,
    /// Caller data, opaque to the controller.
    pub payload: T,
}

impl<T> Outcome<T> {
    /// Creates an outcome with both flags cleared.
    pub fn new(payload: T) -> Self {
        Self {
            must_repeat: false,
            best_repeat: false,
            payload,
        }
    }

    /// Fully acceptable outcome (no flags set).
    pub fn accept(payload: T) -> Self {
        Self::new(payload)
    }

    /// Acceptable outcome that is still worth improving (`best_repeat`).
    pub fn improvable(payload: T) -> Self {
        Self::new(payload).with_best_repeat(true)
    }

    /// Rejected outcome (`must_repeat`).
    pub fn reject(payload: T) -> Self {
        Self::new(payload).with_must_repeat(true)
    }

    #[inline]
    pub fn with_must_repeat(mut self, must_repeat: bool) -> Self {
        self.must_repeat = must_repeat;
        self
    }

    #[inline]
    pub fn with_best_repeat(mut self, best_repeat: bool) -> Self {
        self.best_repeat = best_repeat;
        self
    }

    /// True unless repetition is mandatory.
    #[inline]
    pub fn is_acceptable(&self) -> bool {
        !self.must_repeat
    }

    /// Consumes the outcome and returns its payload.
    pub fn into_payload(self) -> T {
        self.payload
    }

    /// Borrows the payload.
    pub fn payload(&self) -> &T {
        &self.payload
    }

    /// Maps the payload, keeping both flags.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            must_repeat: self.must_repeat,
            best_repeat: self.best_repeat,
            payload: f(self.payload),
        }
    }
}
