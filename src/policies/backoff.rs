//! # Backoff between repeated attempts.
//!
//! [`BackoffPolicy`] spaces out attempts of a
//! [`RetryController`](crate::RetryController). It is optional; without it
//! attempts run back to back.
//!
//! The delay after attempt `n` (1-based) is `first × factor^(n-1)`, clamped to
//! `max`, then jittered. The base never depends on a previous jittered value.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use attemptguard::BackoffPolicy;
//!
//! let backoff = BackoffPolicy::exponential(Duration::from_millis(100), Duration::from_secs(1));
//! assert_eq!(backoff.delay_after(1), Duration::from_millis(100));
//! assert_eq!(backoff.delay_after(2), Duration::from_millis(200));
//! assert_eq!(backoff.delay_after(9), Duration::from_secs(1));
//! ```

use std::time::Duration;

use crate::policies::jitter::JitterPolicy;

/// Delay schedule between attempts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackoffPolicy {
    /// Delay after the first attempt.
    pub first: Duration,
    /// Upper bound for any delay.
    pub max: Duration,
    /// Multiplicative growth per attempt (`1.0` = constant).
    pub factor: f64,
    /// Randomization applied last.
    pub jitter: JitterPolicy,
}

impl Default for BackoffPolicy {
    /// Constant 100ms, capped at 30s, no jitter.
    fn default() -> Self {
        Self::constant(Duration::from_millis(100))
    }
}

impl BackoffPolicy {
    /// Same delay after every attempt.
    pub fn constant(delay: Duration) -> Self {
        Self {
            first: delay,
            max: delay.max(Duration::from_secs(30)),
            factor: 1.0,
            jitter: JitterPolicy::None,
        }
    }

    /// Doubling delay starting at `first`, capped at `max`.
    pub fn exponential(first: Duration, max: Duration) -> Self {
        Self {
            first,
            max,
            factor: 2.0,
            jitter: JitterPolicy::None,
        }
    }

    #[inline]
    pub fn with_jitter(mut self, jitter: JitterPolicy) -> Self {
        self.jitter = jitter;
        self
    }

    /// Delay to wait after `attempt` (1-based) before the next one.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let secs = self.first.as_secs_f64() * self.factor.powi(exp);

        let base = if !secs.is_finite() || secs < 0.0 || secs > self.max.as_secs_f64() {
            self.max
        } else {
            Duration::from_secs_f64(secs)
        };
        self.jitter.apply(base)
    }
}
