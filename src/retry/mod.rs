//! Bounded conditional retry.
//!
//! - [`RetryController`] configurable controller (backoff, label, bus, cancel token)
//! - [`retry`] / [`retry_blocking`] one-shot shorthands

mod controller;

use std::future::Future;

use crate::error::GuardError;
use crate::outcome::{IntoOutcome, Outcome};
use crate::policies::RepeatPolicy;

pub use controller::RetryController;

/// Repeats `computation` under `policy` and returns the last outcome.
///
/// Shorthand for `RetryController::new(policy).run(computation)`.
///
/// # Example
/// ```rust
/// use attemptguard::{retry, GuardError, Outcome, RepeatPolicy};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let last = retry(RepeatPolicy::new(5, 10), || async {
///     Ok::<_, GuardError>(Outcome::improvable("close enough"))
/// })
/// .await
/// .unwrap();
/// assert_eq!(last.payload, "close enough");
/// # }
/// ```
pub async fn retry<F, Fut, R, E>(
    policy: RepeatPolicy,
    computation: F,
) -> Result<Outcome<R::Payload>, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<R, E>>,
    R: IntoOutcome,
    E: From<GuardError>,
{
    RetryController::new(policy).run(computation).await
}

/// Blocking counterpart of [`retry`].
pub fn retry_blocking<F, R, E>(policy: RepeatPolicy, computation: F) -> Result<Outcome<R::Payload>, E>
where
    F: FnMut() -> Result<R, E>,
    R: IntoOutcome,
    E: From<GuardError>,
{
    RetryController::new(policy).run_blocking(computation)
}
