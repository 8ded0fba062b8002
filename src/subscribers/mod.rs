//! # Event subscribers.
//!
//! - [`Subscribe`] extension point for handling [`Event`](crate::Event)s
//! - [`SubscriberSet`] per-subscriber queues, fed from a [`Bus`](crate::Bus)
//! - `LogWriter` stdout writer (feature `logging`)
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use attemptguard::{Bus, Event, EventKind, Subscribe, SubscriberSet};
//! use async_trait::async_trait;
//!
//! struct CountTimeouts;
//!
//! #[async_trait]
//! impl Subscribe for CountTimeouts {
//!     async fn on_event(&self, event: &Event) {
//!         if event.kind == EventKind::DeadlineExceeded {
//!             // increment a counter
//!         }
//!     }
//! }
//!
//! # async fn wire() {
//! let bus = Bus::new(64);
//! let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(CountTimeouts)];
//! let listener = SubscriberSet::new(subs).listen(&bus);
//! # drop(bus); let _ = listener.await;
//! # }
//! ```

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
