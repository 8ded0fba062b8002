//! Events: types and broadcast bus.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `RetryController` (attempt flow, stop decision) and
//!   `TimeoutGuard` / `Deadline` (arm, expiry, disarm). Both publish only when
//!   a bus is attached with `with_bus`.
//! - **Consumers**: anything holding a receiver from [`Bus::subscribe`],
//!   usually a [`SubscriberSet`](crate::SubscriberSet).

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
