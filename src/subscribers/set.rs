//! # SubscriberSet: non-blocking fan-out over multiple subscribers
//!
//! [`SubscriberSet`] hands each [`Event`] to every subscriber without awaiting
//! their processing.
//!
//! - `emit(&Event)` returns immediately; per-subscriber order is FIFO.
//! - A panicking subscriber is isolated; its worker keeps running.
//! - On a full queue the event is dropped for that subscriber only.
//!
//! ```text
//!    Bus ──► listen() ──► emit(&Event)
//!                            ├──► [queue S1] ─► worker S1 ─► on_event()
//!                            └──► [queue SN] ─► worker SN ─► on_event()
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::FutureExt;
use tokio::sync::broadcast::error::RecvError;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::events::{Bus, Event};

use super::Subscribe;

struct SubscriberChannel {
    name: &'static str,
    sender: mpsc::Sender<Arc<Event>>,
}

/// Fan-out with per-subscriber bounded queues and worker tasks.
///
/// Must be created inside a tokio runtime (workers are spawned eagerly).
pub struct SubscriberSet {
    channels: Vec<SubscriberChannel>,
    workers: Vec<JoinHandle<()>>,
    dropped: Arc<AtomicU64>,
}

impl SubscriberSet {
    /// Creates a new set and spawns one worker per subscriber.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>) -> Self {
        let mut channels = Vec::with_capacity(subs.len());
        let mut workers = Vec::with_capacity(subs.len());

        for sub in subs {
            let name = sub.name();
            let (tx, mut rx) = mpsc::channel::<Arc<Event>>(sub.queue_capacity().max(1));

            let handle = tokio::spawn(async move {
                while let Some(ev) = rx.recv().await {
                    let fut = sub.on_event(ev.as_ref());
                    if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await
                    {
                        eprintln!(
                            "[attemptguard] subscriber '{}' panicked: {:?}",
                            sub.name(),
                            panic_err
                        );
                    }
                }
            });

            channels.push(SubscriberChannel { name, sender: tx });
            workers.push(handle);
        }

        Self {
            channels,
            workers,
            dropped: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Fans one event out to all subscribers (non-blocking).
    pub fn emit(&self, event: &Event) {
        let ev = Arc::new(event.clone());
        for channel in &self.channels {
            if let Err(err) = channel.sender.try_send(Arc::clone(&ev)) {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                let why = match err {
                    mpsc::error::TrySendError::Full(_) => "queue full",
                    mpsc::error::TrySendError::Closed(_) => "worker closed",
                };
                eprintln!(
                    "[attemptguard] subscriber '{}' dropped event: {why}",
                    channel.name
                );
            }
        }
    }

    /// Spawns a listener forwarding every event published on `bus` to this set.
    ///
    /// The listener ends when every `Bus` clone is dropped; then the set is
    /// shut down and its workers drained, so awaiting the handle flushes all
    /// pending events.
    pub fn listen(self, bus: &Bus) -> JoinHandle<()> {
        let mut rx = bus.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ev) => self.emit(&ev),
                    Err(RecvError::Lagged(n)) => {
                        self.dropped.fetch_add(n, Ordering::Relaxed);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            self.shutdown().await;
        })
    }

    /// Closes all queues and awaits worker completion.
    pub async fn shutdown(self) {
        drop(self.channels);
        for h in self.workers {
            let _ = h.await;
        }
    }

    /// Events lost to full queues or bus lag so far.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.len()
    }
}
