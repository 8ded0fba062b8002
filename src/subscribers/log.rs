//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints one human-readable line per event to stdout.
//!
//! ## Output format
//! ```text
//! [attempt] label=pick attempt=1
//! [outcome] label=pick attempt=1 must_repeat=false best_repeat=true
//! [repeat] label=pick after_attempt=1 reason=best_repeat
//! [stopped] label=pick attempts=6 reason=soft_window_closed
//! [deadline-armed] label=sum timeout=3000ms
//! [timeout] label=sum timeout=3000ms
//! [deadline-disarmed] label=sum elapsed=3001ms
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Stdout logging subscriber (enabled via the `logging` feature).
///
/// Not intended for production use; implement [`Subscribe`] for structured
/// logging or metrics.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogWriter;

impl LogWriter {
    /// Renders an event as a single log line.
    pub fn format(e: &Event) -> String {
        let label = e.label.as_deref().unwrap_or("-");
        let attempt = e.attempt.unwrap_or_default();
        let reason = e.reason.as_deref().unwrap_or("-");
        match e.kind {
            EventKind::AttemptStarting => format!("[attempt] label={label} attempt={attempt}"),
            EventKind::AttemptFinished => format!(
                "[outcome] label={label} attempt={attempt} must_repeat={} best_repeat={}",
                e.must_repeat.unwrap_or_default(),
                e.best_repeat.unwrap_or_default()
            ),
            EventKind::OutcomeRejected => {
                format!("[rejected] label={label} attempt={attempt} err={reason:?}")
            }
            EventKind::RepeatScheduled => match e.delay_ms {
                Some(ms) => format!(
                    "[repeat] label={label} after_attempt={attempt} reason={reason} delay={ms}ms"
                ),
                None => format!("[repeat] label={label} after_attempt={attempt} reason={reason}"),
            },
            EventKind::RepeatStopped => {
                format!("[stopped] label={label} attempts={attempt} reason={reason}")
            }
            EventKind::DeadlineArmed => format!(
                "[deadline-armed] label={label} timeout={}ms",
                e.timeout_ms.unwrap_or_default()
            ),
            EventKind::DeadlineExceeded => format!(
                "[timeout] label={label} timeout={}ms",
                e.timeout_ms.unwrap_or_default()
            ),
            EventKind::DeadlineDisarmed => format!(
                "[deadline-disarmed] label={label} elapsed={}ms",
                e.elapsed_ms.unwrap_or_default()
            ),
            EventKind::Canceled => format!("[canceled] label={label}"),
        }
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        println!("{}", Self::format(e));
    }

    fn name(&self) -> &'static str {
        "log_writer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_format_lines() {
        let ev = Event::new(EventKind::RepeatStopped)
            .with_label("pick")
            .with_attempt(6)
            .with_reason("soft_window_closed");
        assert_eq!(
            LogWriter::format(&ev),
            "[stopped] label=pick attempts=6 reason=soft_window_closed"
        );

        let ev = Event::new(EventKind::DeadlineExceeded).with_timeout(Duration::from_secs(3));
        assert_eq!(LogWriter::format(&ev), "[timeout] label=- timeout=3000ms");
    }
}
