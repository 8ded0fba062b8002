//! # TimeoutGuard: run one computation under a deadline.
//!
//! ```text
//! run(f):
//!   ├─► Deadline::arm(timeout)                  ──► DeadlineArmed
//!   ├─► f(token) raced against:
//!   │     - the timer (tokio::time::timeout_at, from the armed instant)
//!   │     - the parent token (if attached)
//!   │
//!   ├─ f finished first    ──► its Result, unchanged
//!   ├─ f finished too late ──► result discarded ──► Err(GuardError::DeadlineExceeded)
//!   ├─ timer fired first   ──► token.cancel(), future dropped
//!   │                          ──► DeadlineExceeded ──► Err(GuardError::DeadlineExceeded)
//!   ├─ parent cancelled    ──► future dropped ──► Err(GuardError::Canceled)
//!   └─ every path          ──► Deadline dropped ──► DeadlineDisarmed
//! ```
//!
//! ## Cancellation semantics
//! Interruption is forced: the computation's future is dropped at whatever
//! `.await` it is suspended on, so any effect it started may be left half
//! done. Computations with non-idempotent effects should watch the token they
//! receive and stop at a safe point instead.
//!
//! Blocking closures ([`TimeoutGuard::run_blocking`]) cannot be interrupted at
//! all. On expiry the guard returns immediately and cancels the token; the
//! closure keeps running on the blocking pool until it notices the token or
//! finishes, and its result is discarded.
//!
//! Every call owns its timer and token, so guards may be nested or used
//! concurrently from many tasks.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error::GuardError;
use crate::events::{Bus, Event, EventKind};
use crate::timeout::deadline::Deadline;

/// Wall-clock deadline for a single computation.
///
/// # Example
/// ```rust
/// use std::time::Duration;
/// use attemptguard::{GuardError, TimeoutGuard};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let guard = TimeoutGuard::new(Duration::from_secs(3));
///
/// let sum = guard
///     .run(|_token| async {
///         tokio::time::sleep(Duration::from_millis(10)).await;
///         Ok::<_, GuardError>(7 + 8)
///     })
///     .await;
/// assert_eq!(sum, Ok(15));
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct TimeoutGuard {
    timeout: Option<Duration>,
    label: Option<Arc<str>>,
    bus: Option<Bus>,
    parent: Option<CancellationToken>,
}

impl TimeoutGuard {
    /// Creates a guard; `Duration::ZERO` means no deadline.
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout).filter(|d| *d > Duration::ZERO),
            ..Self::default()
        }
    }

    /// Creates a guard from fractional seconds.
    ///
    /// Returns `None` for negative, NaN or infinite input. A positive value
    /// too small to represent rounds up to one nanosecond, never to "no
    /// deadline".
    pub fn from_secs_f64(seconds: f64) -> Option<Self> {
        let timeout = Duration::try_from_secs_f64(seconds).ok()?;
        if timeout.is_zero() && seconds > 0.0 {
            return Some(Self::new(Duration::from_nanos(1)));
        }
        Some(Self::new(timeout))
    }

    /// Creates a guard using [`Config::default_timeout`].
    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.default_timeout().unwrap_or(Duration::ZERO))
    }

    /// Names the guarded computation in published events.
    pub fn with_label(mut self, label: impl Into<Arc<str>>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Publishes deadline events to `bus`.
    pub fn with_bus(mut self, bus: Bus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Aborts the call with [`GuardError::Canceled`] when `parent` is cancelled.
    pub fn with_parent(mut self, parent: CancellationToken) -> Self {
        self.parent = Some(parent);
        self
    }

    /// The configured deadline (`None` = unguarded).
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Runs `computation` under the deadline.
    ///
    /// `computation` receives a token that is cancelled when the deadline
    /// expires, when the parent is cancelled, and when the call returns.
    /// Errors returned by `computation` are passed through unchanged.
    pub async fn run<F, Fut, T, E>(&self, computation: F) -> Result<T, E>
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<GuardError>,
    {
        let parent = self.parent.clone().unwrap_or_default();

        let Some(timeout) = self.timeout else {
            let token = parent.child_token();
            let _disarm = token.clone().drop_guard();
            return self.race_parent(&parent, computation(token)).await;
        };

        let deadline = Deadline::arm(timeout, &parent, self.label.clone(), self.bus.clone());
        let fut = computation(deadline.token().clone());

        match time::timeout_at(deadline.expires_at(), self.race_parent(&parent, fut)).await {
            // A computation that never yields finishes past the timer.
            Ok(_) if deadline.is_expired() => {
                deadline.expire();
                Err(GuardError::DeadlineExceeded { timeout }.into())
            }
            Ok(res) => res,
            Err(_elapsed) => {
                deadline.expire();
                Err(GuardError::DeadlineExceeded { timeout }.into())
            }
        }
    }

    /// Runs a blocking closure on tokio's blocking pool under the deadline.
    ///
    /// A panic inside the closure is resumed on the caller. On expiry the
    /// closure is abandoned, not stopped; see the module docs.
    pub async fn run_blocking<F, T, E>(&self, computation: F) -> Result<T, E>
    where
        F: FnOnce(CancellationToken) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<GuardError> + Send + 'static,
    {
        self.run(|token| async move {
            match tokio::task::spawn_blocking(move || computation(token)).await {
                Ok(res) => res,
                Err(join_err) => match join_err.try_into_panic() {
                    Ok(panic) => std::panic::resume_unwind(panic),
                    Err(_) => Err(GuardError::Canceled.into()),
                },
            }
        })
        .await
    }

    async fn race_parent<Fut, T, E>(&self, parent: &CancellationToken, fut: Fut) -> Result<T, E>
    where
        Fut: Future<Output = Result<T, E>>,
        E: From<GuardError>,
    {
        tokio::select! {
            biased;
            res = fut => res,
            _ = parent.cancelled() => {
                if let Some(bus) = &self.bus {
                    bus.publish(Event::new(EventKind::Canceled).with_label_opt(self.label.as_ref()));
                }
                Err(GuardError::Canceled.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[derive(Debug, PartialEq)]
    enum AppError {
        Guard(GuardError),
        Overflow,
    }

    impl From<GuardError> for AppError {
        fn from(e: GuardError) -> Self {
            AppError::Guard(e)
        }
    }

    async fn compute_sum(delay: Duration, x: i32, y: i32) -> Result<i32, GuardError> {
        time::sleep(delay).await;
        Ok(x + y)
    }

    #[tokio::test(start_paused = true)]
    async fn test_finishes_before_deadline() {
        let guard = TimeoutGuard::new(Duration::from_secs(3));
        let res = guard
            .run(|_| compute_sum(Duration::from_secs(1), 7, 8))
            .await;
        assert_eq!(res, Ok(15));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_exceeded_then_next_call_is_clean() {
        let guard = TimeoutGuard::new(Duration::from_secs(3));

        let err = guard
            .run(|_| compute_sum(Duration::from_secs(5), 7, 8))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            GuardError::DeadlineExceeded {
                timeout: Duration::from_secs(3)
            }
        );
        assert_eq!(err.to_string(), "Timeout Detected!");

        let res = guard
            .run(|_| compute_sum(Duration::from_millis(2900), 1, 2))
            .await;
        assert_eq!(res, Ok(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_cancels_token() {
        let seen: Arc<Mutex<Option<CancellationToken>>> = Arc::default();
        let slot = seen.clone();

        let res = TimeoutGuard::new(Duration::from_millis(100))
            .run(|token| async move {
                *slot.lock().unwrap() = Some(token);
                time::sleep(Duration::from_secs(60)).await;
                Ok::<_, GuardError>(())
            })
            .await;

        assert!(res.unwrap_err().is_timeout());
        let token = seen.lock().unwrap().take().unwrap();
        assert!(token.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_application_error_passes_through() {
        let res: Result<i32, AppError> = TimeoutGuard::new(Duration::from_secs(1))
            .run(|_| async { Err(AppError::Overflow) })
            .await;
        assert_eq!(res, Err(AppError::Overflow));

        let res: Result<i32, AppError> = TimeoutGuard::new(Duration::from_secs(1))
            .run(|_| async {
                time::sleep(Duration::from_secs(2)).await;
                Ok(1)
            })
            .await;
        assert_eq!(
            res,
            Err(AppError::Guard(GuardError::DeadlineExceeded {
                timeout: Duration::from_secs(1)
            }))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_timeout_runs_unguarded() {
        let guard = TimeoutGuard::new(Duration::ZERO);
        assert_eq!(guard.timeout(), None);
        let res = guard
            .run(|_| compute_sum(Duration::from_secs(3600), 2, 2))
            .await;
        assert_eq!(res, Ok(4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_events_on_every_exit_path() {
        let bus = Bus::new(32);
        let mut rx = bus.subscribe();
        let guard = TimeoutGuard::new(Duration::from_secs(3))
            .with_label("sum")
            .with_bus(bus);

        let _ = guard
            .run(|_| compute_sum(Duration::from_secs(1), 7, 8))
            .await;
        let _ = guard
            .run(|_| async { Err::<i32, _>(GuardError::Canceled) })
            .await;
        let _ = guard
            .run(|_| compute_sum(Duration::from_secs(5), 7, 8))
            .await;

        let mut kinds = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            assert_eq!(ev.label.as_deref(), Some("sum"));
            kinds.push(ev.kind);
        }
        assert_eq!(
            kinds,
            vec![
                EventKind::DeadlineArmed,
                EventKind::DeadlineDisarmed,
                EventKind::DeadlineArmed,
                EventKind::DeadlineDisarmed,
                EventKind::DeadlineArmed,
                EventKind::DeadlineExceeded,
                EventKind::DeadlineDisarmed,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_parent_cancellation() {
        let parent = CancellationToken::new();
        let guard = TimeoutGuard::new(Duration::from_secs(10)).with_parent(parent.clone());

        let canceller = tokio::spawn(async move {
            time::sleep(Duration::from_secs(1)).await;
            parent.cancel();
        });

        let res = guard
            .run(|_| compute_sum(Duration::from_secs(5), 1, 1))
            .await;
        assert_eq!(res, Err(GuardError::Canceled));
        canceller.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_nested_guards_are_independent() {
        let outer = TimeoutGuard::new(Duration::from_secs(10));
        let inner = TimeoutGuard::new(Duration::from_secs(1));

        let res = outer
            .run(|_| async {
                let first = inner
                    .run(|_| compute_sum(Duration::from_secs(2), 1, 1))
                    .await;
                assert!(first.unwrap_err().is_timeout());
                compute_sum(Duration::from_secs(2), 3, 4).await
            })
            .await;
        assert_eq!(res, Ok(7));
    }

    #[test]
    fn test_from_secs_f64() {
        let guard = TimeoutGuard::from_secs_f64(2.5).unwrap();
        assert_eq!(guard.timeout(), Some(Duration::from_millis(2500)));
        assert!(TimeoutGuard::from_secs_f64(-1.0).is_none());
        assert!(TimeoutGuard::from_secs_f64(f64::NAN).is_none());
        assert_eq!(TimeoutGuard::from_secs_f64(0.0).unwrap().timeout(), None);
    }

    #[test]
    fn test_from_secs_f64_tiny_value_keeps_a_deadline() {
        let guard = TimeoutGuard::from_secs_f64(1e-10).unwrap();
        assert_eq!(guard.timeout(), Some(Duration::from_nanos(1)));
    }

    #[test]
    fn test_from_config() {
        let cfg = Config {
            timeout: Duration::ZERO,
            ..Config::default()
        };
        assert_eq!(TimeoutGuard::from_config(&cfg).timeout(), None);
        assert_eq!(
            TimeoutGuard::from_config(&Config::default()).timeout(),
            Some(Duration::from_secs(7))
        );
    }

    #[tokio::test]
    async fn test_non_yielding_computation_past_deadline_fails() {
        let guard = TimeoutGuard::new(Duration::from_millis(100));

        let res = guard
            .run(|_| async {
                std::thread::sleep(Duration::from_millis(300));
                Ok::<_, GuardError>(15)
            })
            .await;
        assert_eq!(
            res,
            Err(GuardError::DeadlineExceeded {
                timeout: Duration::from_millis(100)
            })
        );

        let res = guard
            .run(|_| {
                std::thread::sleep(Duration::from_millis(300));
                async { Ok::<_, GuardError>(15) }
            })
            .await;
        assert!(res.unwrap_err().is_timeout());
    }

    #[tokio::test]
    async fn test_late_result_cancels_token_and_reports_exceeded() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        let seen: Arc<Mutex<Option<CancellationToken>>> = Arc::default();
        let slot = seen.clone();

        let res = TimeoutGuard::new(Duration::from_millis(50))
            .with_bus(bus)
            .run(|token| async move {
                *slot.lock().unwrap() = Some(token);
                std::thread::sleep(Duration::from_millis(150));
                Ok::<_, GuardError>(())
            })
            .await;
        assert!(res.unwrap_err().is_timeout());
        assert!(seen.lock().unwrap().take().unwrap().is_cancelled());

        let kinds: Vec<_> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|ev| ev.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::DeadlineArmed,
                EventKind::DeadlineExceeded,
                EventKind::DeadlineDisarmed,
            ]
        );
    }

    #[tokio::test]
    async fn test_blocking_finishes() {
        let res = TimeoutGuard::new(Duration::from_secs(5))
            .run_blocking(|_| {
                std::thread::sleep(Duration::from_millis(20));
                Ok::<_, GuardError>(7 + 8)
            })
            .await;
        assert_eq!(res, Ok(15));
    }

    #[tokio::test]
    async fn test_blocking_timeout_signals_token() {
        let stopped = Arc::new(AtomicBool::new(false));
        let flag = stopped.clone();

        let res = TimeoutGuard::new(Duration::from_millis(50))
            .run_blocking(move |token| {
                while !token.is_cancelled() {
                    std::thread::sleep(Duration::from_millis(5));
                }
                flag.store(true, Ordering::SeqCst);
                Ok::<_, GuardError>(())
            })
            .await;
        assert!(res.unwrap_err().is_timeout());

        for _ in 0..200 {
            if stopped.load(Ordering::SeqCst) {
                break;
            }
            time::sleep(Duration::from_millis(5)).await;
        }
        assert!(stopped.load(Ordering::SeqCst));
    }

    #[tokio::test]
    #[should_panic(expected = "kaboom")]
    async fn test_blocking_panic_is_resumed() {
        let _ = TimeoutGuard::new(Duration::from_secs(5))
            .run_blocking(|_| -> Result<(), GuardError> { panic!("kaboom") })
            .await;
    }
}
