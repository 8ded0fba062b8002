//! Wall-clock timeout guard.
//!
//! - [`TimeoutGuard`] configurable guard (label, bus, parent token)
//! - [`Deadline`] the armed limit of one guarded call
//! - [`with_timeout`] / [`with_timeout_blocking`] one-shot shorthands

mod deadline;
mod guard;

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::GuardError;

pub use deadline::Deadline;
pub use guard::TimeoutGuard;

/// Runs `computation` and fails with [`GuardError::DeadlineExceeded`] if it
/// takes longer than `timeout`.
///
/// Shorthand for `TimeoutGuard::new(timeout).run(computation)`.
pub async fn with_timeout<F, Fut, T, E>(timeout: Duration, computation: F) -> Result<T, E>
where
    F: FnOnce(CancellationToken) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: From<GuardError>,
{
    TimeoutGuard::new(timeout).run(computation).await
}

/// Blocking counterpart of [`with_timeout`]; see [`TimeoutGuard::run_blocking`].
pub async fn with_timeout_blocking<F, T, E>(timeout: Duration, computation: F) -> Result<T, E>
where
    F: FnOnce(CancellationToken) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: From<GuardError> + Send + 'static,
{
    TimeoutGuard::new(timeout).run_blocking(computation).await
}
