//! # Demo: conditional_repeat
//!
//! Picks a random number from an unknown list. The value must lie in `1..=10`
//! (otherwise the attempt is rejected) and is best when it equals `1`
//! (otherwise it is merely improvable).
//!
//! ## Flow
//! ```text
//! retry(RepeatPolicy(5, 10))
//!   ├─► pick() → 17  → must_repeat  → repeat
//!   ├─► pick() → 4   → best_repeat  → repeat (inside soft window)
//!   ├─► pick() → 1   → accepted     → stop
//!   └─► last outcome returned
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example conditional_repeat --features logging
//! ```

use std::sync::Arc;

use attemptguard::{
    Bus, GuardError, LogWriter, Outcome, RepeatPolicy, RetryController, Subscribe, SubscriberSet,
};
use rand::seq::{IndexedRandom, SliceRandom};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = rand::rng();
    let mut choices: Vec<u32> = (1..=30).collect();
    choices.shuffle(&mut rng);
    choices.truncate(20);

    let bus = Bus::new(64);
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter)];
    let listener = SubscriberSet::new(subs).listen(&bus);

    let controller = RetryController::new(RepeatPolicy::new(5, 10))
        .with_label("rand_int")
        .with_bus(bus);

    let result = controller
        .run(|| {
            let chosen = choices.choose(&mut rng).copied().unwrap_or_default();
            async move {
                Ok::<_, GuardError>(
                    Outcome::new(chosen)
                        .with_must_repeat(!(1..=10).contains(&chosen))
                        .with_best_repeat(chosen != 1),
                )
            }
        })
        .await?;

    drop(controller);
    listener.await?;

    println!("choice list: {choices:?}");
    println!("chosen data: {}", result.payload);
    Ok(())
}
