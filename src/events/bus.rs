//! # Event bus.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`]. The retry
//! controller and the timeout guard publish to it when one is attached; any
//! number of receivers (for example a [`SubscriberSet`](crate::SubscriberSet))
//! consume from it.
//!
//! ```text
//! RetryController ──┐
//!                   ├──► Bus ──► receivers (SubscriberSet::listen, tests, ...)
//! TimeoutGuard    ──┘
//! ```
//!
//! ## Rules
//! - `publish()` never blocks and never awaits, so it is usable from blocking code.
//! - A single ring buffer of `capacity` events is shared by all receivers;
//!   slow receivers observe `RecvError::Lagged(n)`.
//! - Events published while nobody listens are dropped.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for events. Cheap to clone.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a new bus; capacity is clamped to at least 1.
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel::<Event>(capacity.max(1));
        Self { tx }
    }

    /// Publishes an event to all current receivers (fire-and-forget).
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Creates a receiver that observes events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }

    /// Number of live receivers.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
