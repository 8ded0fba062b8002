//! # Demo: check_timeout
//!
//! Runs a blocking "slow sum" twice under a 3 second deadline.
//!
//! ```text
//! delay_operations(1s, 7, 8) ──► Success: 15
//! delay_operations(5s, 7, 8) ──► Error: Timeout Detected!
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example check_timeout
//! ```

use std::time::Duration;

use attemptguard::{GuardError, TimeoutGuard};
use tokio_util::sync::CancellationToken;

/// Sleeps in small steps so it can stop once the deadline cancels the token.
fn delay_operations(
    token: CancellationToken,
    delay: Duration,
    x: i64,
    y: i64,
) -> Result<i64, GuardError> {
    let step = Duration::from_millis(50);
    let mut slept = Duration::ZERO;
    while slept < delay {
        if token.is_cancelled() {
            return Err(GuardError::Canceled);
        }
        std::thread::sleep(step);
        slept += step;
    }
    Ok(x + y)
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let guard = TimeoutGuard::new(Duration::from_secs(3)).with_label("delay_operations");

    for delay in [Duration::from_secs(1), Duration::from_secs(5)] {
        match guard
            .run_blocking(move |token| delay_operations(token, delay, 7, 8))
            .await
        {
            Ok(sum) => println!("Success: {sum}"),
            Err(err) => println!("Error: {err}"),
        }
    }
}
