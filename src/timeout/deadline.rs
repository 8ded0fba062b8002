//! # Deadline: one armed wall-clock limit.
//!
//! A [`Deadline`] is armed right before a guarded computation starts and lives
//! exactly as long as that call. It owns the per-call [`CancellationToken`]
//! handed to the computation.
//!
//! ## Lifecycle
//! ```text
//! arm()  ──► DeadlineArmed
//!   │
//!   ├─ computation returns / fails ─────────────────┐
//!   ├─ timer fires ──► expire() ──► DeadlineExceeded │
//!   └─ guarded future dropped / panic unwinding ────┤
//!                                                   ▼
//!                              Drop: token.cancel() ──► DeadlineDisarmed
//! ```
//!
//! Disarming happens in `Drop`, so no exit path can leave a deadline pending.
//! Each deadline is independent; nothing is shared between calls.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::events::{Bus, Event, EventKind};

/// Armed deadline of one guarded call.
#[derive(Debug)]
pub struct Deadline {
    timeout: Duration,
    armed_at: Instant,
    token: CancellationToken,
    label: Option<Arc<str>>,
    bus: Option<Bus>,
}

impl Deadline {
    /// Arms a deadline whose token is a child of `parent`.
    pub(crate) fn arm(
        timeout: Duration,
        parent: &CancellationToken,
        label: Option<Arc<str>>,
        bus: Option<Bus>,
    ) -> Self {
        let deadline = Self {
            timeout,
            armed_at: Instant::now(),
            token: parent.child_token(),
            label,
            bus,
        };
        deadline.publish(|| Event::new(EventKind::DeadlineArmed));
        deadline
    }

    /// The allotted duration.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Instant at which the deadline expires.
    pub fn expires_at(&self) -> Instant {
        self.armed_at + self.timeout
    }

    /// Time since the deadline was armed.
    pub fn elapsed(&self) -> Duration {
        self.armed_at.elapsed()
    }

    /// Time left before expiry (zero once expired).
    pub fn remaining(&self) -> Duration {
        self.timeout.saturating_sub(self.elapsed())
    }

    pub fn is_expired(&self) -> bool {
        self.elapsed() >= self.timeout
    }

    /// Token handed to the guarded computation; cancelled on expiry and on disarm.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Delivers cancellation after the timer fired.
    pub(crate) fn expire(&self) {
        self.token.cancel();
        self.publish(|| Event::new(EventKind::DeadlineExceeded));
    }

    /// Builds and sends an event only when a bus is attached.
    fn publish(&self, make: impl FnOnce() -> Event) {
        if let Some(bus) = &self.bus {
            bus.publish(
                make()
                    .with_label_opt(self.label.as_ref())
                    .with_timeout(self.timeout),
            );
        }
    }
}

impl Drop for Deadline {
    fn drop(&mut self) {
        self.token.cancel();
        self.publish(|| Event::new(EventKind::DeadlineDisarmed).with_elapsed(self.elapsed()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_remaining_and_expiry() {
        let d = Deadline::arm(
            Duration::from_secs(3),
            &CancellationToken::new(),
            None,
            None,
        );
        assert_eq!(d.remaining(), Duration::from_secs(3));
        assert_eq!(d.expires_at() - Instant::now(), Duration::from_secs(3));
        assert!(!d.is_expired());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(d.remaining(), Duration::from_secs(1));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(d.is_expired());
        assert_eq!(d.remaining(), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_drop_cancels_token_and_publishes() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        let parent = CancellationToken::new();

        let d = Deadline::arm(
            Duration::from_secs(1),
            &parent,
            Some(Arc::from("sum")),
            Some(bus),
        );
        let token = d.token().clone();
        assert!(!token.is_cancelled());
        drop(d);

        assert!(token.is_cancelled());
        assert!(!parent.is_cancelled());

        let armed = rx.try_recv().unwrap();
        assert_eq!(armed.kind, EventKind::DeadlineArmed);
        assert_eq!(armed.label.as_deref(), Some("sum"));
        assert_eq!(rx.try_recv().unwrap().kind, EventKind::DeadlineDisarmed);
    }

    #[tokio::test]
    async fn test_no_event_is_built_without_bus() {
        let d = Deadline::arm(Duration::from_secs(1), &CancellationToken::new(), None, None);
        let mut built = false;
        d.publish(|| {
            built = true;
            Event::new(EventKind::DeadlineExceeded)
        });
        assert!(!built);

        let bus = Bus::new(4);
        let mut rx = bus.subscribe();
        let d = Deadline::arm(Duration::from_secs(1), &CancellationToken::new(), None, Some(bus));
        d.publish(|| {
            built = true;
            Event::new(EventKind::DeadlineExceeded)
        });
        assert!(built);
        assert_eq!(rx.try_recv().unwrap().kind, EventKind::DeadlineArmed);
        assert_eq!(rx.try_recv().unwrap().kind, EventKind::DeadlineExceeded);
    }

    #[tokio::test]
    async fn test_parent_cancel_reaches_token() {
        let parent = CancellationToken::new();
        let d = Deadline::arm(Duration::from_secs(1), &parent, None, None);
        parent.cancel();
        assert!(d.token().is_cancelled());
    }
}
