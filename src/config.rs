//! # Shared configuration.
//!
//! [`Config`] centralizes the knobs of both combinators so an application can
//! build them from one place:
//! - `RetryController::from_config(&cfg)`
//! - `TimeoutGuard::from_config(&cfg)`
//!
//! ## Sentinel values
//! - `timeout = 0s` → no deadline
//! - `backoff = None` → attempts run back to back

use std::time::Duration;

use crate::policies::{BackoffPolicy, RepeatPolicy};

/// Configuration for the retry controller and timeout guard.
///
/// ## Field semantics
/// - `best_stop`: soft attempt threshold (see [`RepeatPolicy`])
/// - `must_stop`: hard attempt cap
/// - `timeout`: default deadline (`0s` = none)
/// - `backoff`: optional delay between attempts
/// - `bus_capacity`: ring buffer size for a [`Bus`](crate::Bus) built from this config (min 1)
#[derive(Clone, Debug)]
pub struct Config {
    /// Soft attempt threshold.
    pub best_stop: u32,
    /// Hard attempt cap.
    pub must_stop: u32,
    /// Default deadline for guarded calls.
    ///
    /// - `Duration::ZERO` = no deadline
    /// - `> 0` = applied per guarded call
    pub timeout: Duration,
    /// Delay schedule between attempts.
    pub backoff: Option<BackoffPolicy>,
    /// Event bus capacity.
    pub bus_capacity: usize,
}

impl Config {
    /// Returns the repeat thresholds as a [`RepeatPolicy`].
    #[inline]
    pub fn repeat_policy(&self) -> RepeatPolicy {
        RepeatPolicy::new(self.best_stop, self.must_stop)
    }

    /// Returns the default deadline as an `Option`.
    ///
    /// - `None` → no deadline
    /// - `Some(d)` → deadline applied per call
    #[inline]
    pub fn default_timeout(&self) -> Option<Duration> {
        if self.timeout == Duration::ZERO {
            None
        } else {
            Some(self.timeout)
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `best_stop = 5`, `must_stop = 10`
    /// - `timeout = 7s`
    /// - `backoff = None`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        let policy = RepeatPolicy::default();
        Self {
            best_stop: policy.best_stop,
            must_stop: policy.must_stop,
            timeout: Duration::from_secs(7),
            backoff: None,
            bus_capacity: 1024,
        }
    }
}
