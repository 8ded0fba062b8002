//! # Repeat policy: when a retried computation stops.
//!
//! [`RepeatPolicy`] holds two attempt-count thresholds:
//! - `best_stop` the soft window; inside it an improvable outcome is retried;
//! - `must_stop` the hard cap; past it the loop stops unconditionally.
//!
//! After attempt `k` (1-based) the loop stops if **any** clause holds:
//! ```text
//! 1. k > must_stop                                      → HardCapExceeded
//! 2. k > best_stop && !must_repeat                      → SoftWindowClosed
//! 3. k < best_stop && !must_repeat && !best_repeat      → Accepted
//! ```
//! Otherwise it continues. At `k == best_stop` neither clause 2 nor clause 3
//! can fire, so one more attempt always runs there (unless clause 1 fires).
//!
//! With the default policy (5, 10):
//! ```text
//! always must_repeat          → 11 attempts
//! always best_repeat          →  6 attempts
//! always acceptable           →  1 attempt
//! ```
//!
//! `best_stop <= must_stop` is expected but not enforced. With
//! `best_stop > must_stop` the clauses are still evaluated literally, so the
//! hard cap keeps bounding the loop at `must_stop + 1` attempts.

use serde::{Deserialize, Serialize};

use crate::outcome::Outcome;

/// Attempt-count thresholds for [`RetryController`](crate::RetryController).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepeatPolicy {
    /// Soft threshold: improvement is pursued up to this attempt.
    #[serde(alias = "bestStopTime")]
    pub best_stop: u32,
    /// Hard cap: attempts past this number always stop.
    #[serde(alias = "mustStopTime")]
    pub must_stop: u32,
}

impl Default for RepeatPolicy {
    /// Returns `best_stop = 5`, `must_stop = 10`.
    fn default() -> Self {
        Self {
            best_stop: 5,
            must_stop: 10,
        }
    }
}

/// Why the loop stopped after an attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// Attempt number exceeded `must_stop`.
    HardCapExceeded,
    /// Past `best_stop` and the outcome was not rejected.
    SoftWindowClosed,
    /// Inside the soft window with a fully acceptable outcome.
    Accepted,
}

impl StopReason {
    pub fn as_label(&self) -> &'static str {
        match self {
            StopReason::HardCapExceeded => "hard_cap_exceeded",
            StopReason::SoftWindowClosed => "soft_window_closed",
            StopReason::Accepted => "accepted",
        }
    }
}

/// Why the loop runs another attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContinueReason {
    /// Outcome was rejected and the hard cap is not exceeded.
    MustRepeat,
    /// Outcome is improvable and the soft window is still open.
    BestRepeat,
    /// Attempt number is exactly `best_stop`.
    Boundary,
}

impl ContinueReason {
    pub fn as_label(&self) -> &'static str {
        match self {
            ContinueReason::MustRepeat => "must_repeat",
            ContinueReason::BestRepeat => "best_repeat",
            ContinueReason::Boundary => "boundary",
        }
    }
}

/// Decision taken after one attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Stop(StopReason),
    Continue(ContinueReason),
}

impl Verdict {
    #[inline]
    pub fn is_stop(&self) -> bool {
        matches!(self, Verdict::Stop(_))
    }
}

impl RepeatPolicy {
    pub fn new(best_stop: u32, must_stop: u32) -> Self {
        Self {
            best_stop,
            must_stop,
        }
    }

    /// True when `best_stop <= must_stop`.
    #[inline]
    pub fn is_consistent(&self) -> bool {
        self.best_stop <= self.must_stop
    }

    /// Decides whether to stop after `attempt` (1-based) produced `outcome`.
    ///
    /// # Example
    /// ```
    /// use attemptguard::{ContinueReason, Outcome, RepeatPolicy, StopReason, Verdict};
    ///
    /// let policy = RepeatPolicy::default();
    /// assert_eq!(policy.decide(1, &Outcome::accept(())), Verdict::Stop(StopReason::Accepted));
    /// assert_eq!(policy.decide(5, &Outcome::accept(())), Verdict::Continue(ContinueReason::Boundary));
    /// assert_eq!(policy.decide(6, &Outcome::improvable(())), Verdict::Stop(StopReason::SoftWindowClosed));
    /// assert_eq!(policy.decide(11, &Outcome::reject(())), Verdict::Stop(StopReason::HardCapExceeded));
    /// ```
    pub fn decide<T>(&self, attempt: u32, outcome: &Outcome<T>) -> Verdict {
        self.decide_flags(attempt, outcome.must_repeat, outcome.best_repeat)
    }

    /// Same as [`decide`](Self::decide), on raw flags.
    pub fn decide_flags(&self, attempt: u32, must_repeat: bool, best_repeat: bool) -> Verdict {
        if attempt > self.must_stop {
            return Verdict::Stop(StopReason::HardCapExceeded);
        }
        if attempt > self.best_stop && !must_repeat {
            return Verdict::Stop(StopReason::SoftWindowClosed);
        }
        if attempt < self.best_stop && !must_repeat && !best_repeat {
            return Verdict::Stop(StopReason::Accepted);
        }

        if must_repeat {
            Verdict::Continue(ContinueReason::MustRepeat)
        } else if attempt == self.best_stop {
            Verdict::Continue(ContinueReason::Boundary)
        } else {
            Verdict::Continue(ContinueReason::BestRepeat)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Number of attempts the loop performs when every attempt yields the same flags.
    fn attempts_with(policy: RepeatPolicy, must: bool, best: bool) -> u32 {
        let mut k = 0;
        loop {
            k += 1;
            if policy.decide_flags(k, must, best).is_stop() {
                return k;
            }
        }
    }

    #[test]
    fn test_default_thresholds() {
        let p = RepeatPolicy::default();
        assert_eq!(p.best_stop, 5);
        assert_eq!(p.must_stop, 10);
        assert!(p.is_consistent());
    }

    #[test]
    fn test_always_must_repeat_runs_to_hard_cap() {
        let p = RepeatPolicy::default();
        assert_eq!(attempts_with(p, true, false), 11);
        assert_eq!(attempts_with(p, true, true), 11);
    }

    #[test]
    fn test_always_acceptable_stops_at_first() {
        assert_eq!(attempts_with(RepeatPolicy::default(), false, false), 1);
    }

    #[test]
    fn test_always_improvable_stops_after_soft_window() {
        assert_eq!(attempts_with(RepeatPolicy::default(), false, true), 6);
    }

    #[test]
    fn test_boundary_always_continues() {
        let p = RepeatPolicy::default();
        for (must, best) in [(false, false), (false, true), (true, false), (true, true)] {
            assert!(
                !p.decide_flags(5, must, best).is_stop(),
                "must={must} best={best} stopped at the boundary"
            );
        }
        assert_eq!(
            p.decide_flags(5, false, false),
            Verdict::Continue(ContinueReason::Boundary)
        );
    }

    #[test]
    fn test_boundary_beyond_hard_cap_stops() {
        let p = RepeatPolicy::new(5, 3);
        assert!(!p.is_consistent());
        assert_eq!(
            p.decide_flags(3, false, false),
            Verdict::Stop(StopReason::Accepted)
        );
        assert_eq!(
            p.decide_flags(4, false, false),
            Verdict::Stop(StopReason::HardCapExceeded)
        );
        assert_eq!(attempts_with(p, true, false), 4);
        assert_eq!(attempts_with(p, false, true), 4);
    }

    #[test]
    fn test_acceptable_at_boundary_stops_one_later() {
        // Attempts 1..4 are improvable, the 5th is fine: the boundary forces a 6th.
        let p = RepeatPolicy::default();
        assert!(!p.decide_flags(4, false, true).is_stop());
        assert!(!p.decide_flags(5, false, false).is_stop());
        assert_eq!(
            p.decide_flags(6, false, false),
            Verdict::Stop(StopReason::SoftWindowClosed)
        );
    }

    #[test]
    fn test_zero_thresholds() {
        let p = RepeatPolicy::new(0, 0);
        assert_eq!(
            p.decide_flags(1, false, false),
            Verdict::Stop(StopReason::HardCapExceeded)
        );
    }

    #[test]
    fn test_deserialize_with_aliases() {
        let p: RepeatPolicy =
            serde_json::from_str(r#"{"bestStopTime": 2, "mustStopTime": 4}"#).unwrap();
        assert_eq!(p, RepeatPolicy::new(2, 4));

        let p: RepeatPolicy = serde_json::from_str(r#"{"must_stop": 7}"#).unwrap();
        assert_eq!(p, RepeatPolicy::new(5, 7));
    }
}
