//! Error types raised by the combinators themselves.
//!
//! [`GuardError`] covers the only failures that originate inside
//! [`RetryController`](crate::RetryController) and
//! [`TimeoutGuard`](crate::TimeoutGuard). Every other failure belongs to the
//! wrapped computation and is passed through untouched.
//!
//! The combinators are generic over the caller's error type `E` and only
//! require `E: From<GuardError>`, so their own failures are folded into the
//! caller's error with the usual `?`/`From` conversion.

use std::time::Duration;
use thiserror::Error;

/// # Errors produced by the combinators.
///
/// - [`GuardError::InvalidOutcomeShape`] is a contract violation of the retried
///   computation and is never retried.
/// - [`GuardError::DeadlineExceeded`] is the timeout failure; its display is the
///   fixed diagnostic `"Timeout Detected!"`.
/// - [`GuardError::Canceled`] is reported when an attached parent token is
///   cancelled before the work finishes.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GuardError {
    /// An attempt returned something that is not a well-formed outcome record.
    #[error("invalid outcome shape on attempt {attempt}: {reason}")]
    InvalidOutcomeShape {
        /// Attempt number (1-based) that produced the malformed value.
        attempt: u32,
        /// What was wrong with the value.
        reason: String,
    },

    /// The deadline elapsed before the guarded computation finished.
    #[error("Timeout Detected!")]
    DeadlineExceeded {
        /// The deadline that was exceeded.
        timeout: Duration,
    },

    /// The parent cancellation token fired before the work finished.
    #[error("context cancelled")]
    Canceled,
}

impl GuardError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use attemptguard::GuardError;
    /// use std::time::Duration;
    ///
    /// let err = GuardError::DeadlineExceeded { timeout: Duration::from_secs(3) };
    /// assert_eq!(err.as_label(), "deadline_exceeded");
    /// assert_eq!(err.to_string(), "Timeout Detected!");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            GuardError::InvalidOutcomeShape { .. } => "invalid_outcome_shape",
            GuardError::DeadlineExceeded { .. } => "deadline_exceeded",
            GuardError::Canceled => "canceled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            GuardError::InvalidOutcomeShape { attempt, reason } => {
                format!("attempt {attempt} returned a malformed outcome: {reason}")
            }
            GuardError::DeadlineExceeded { timeout } => {
                format!("Timeout Detected! (deadline {timeout:?})")
            }
            GuardError::Canceled => "context cancelled".to_string(),
        }
    }

    /// True for [`GuardError::DeadlineExceeded`].
    pub fn is_timeout(&self) -> bool {
        matches!(self, GuardError::DeadlineExceeded { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadline_display_is_fixed() {
        let a = GuardError::DeadlineExceeded {
            timeout: Duration::from_secs(1),
        };
        let b = GuardError::DeadlineExceeded {
            timeout: Duration::from_millis(7),
        };
        assert_eq!(a.to_string(), b.to_string());
        assert_eq!(a.to_string(), "Timeout Detected!");
        assert!(a.as_message().contains("1s"));
    }

    #[test]
    fn test_labels() {
        let shape = GuardError::InvalidOutcomeShape {
            attempt: 1,
            reason: "not an object".into(),
        };
        assert_eq!(shape.as_label(), "invalid_outcome_shape");
        assert!(!shape.is_timeout());
        assert_eq!(GuardError::Canceled.as_label(), "canceled");
        assert!(shape.as_message().contains("attempt 1"));
    }
}
