//! Real-time driver on a tokio timer.
//!
//! Plays a touch script against the wall clock: sleeps until the next touch
//! event or pulse deadline, whichever comes first, and feeds the session.
//! Everything runs on the calling task, so the engine stays single-threaded.

use std::time::Duration;

use tokio::time::{sleep_until, Instant};

use crate::error::Result;
use crate::events::Event;
use crate::feedback::FeedbackSink;
use crate::gesture::{GestureSession, TouchScript};
use crate::profile::EngineConfig;
use crate::replay::default_end_ms;

/// Plays `script` in real time, reporting each event as it happens.
///
/// Stops at `until_ms` (relative to the start of playback), or at the
/// [`default_end_ms`] of the script.
pub async fn play<S, F>(
    script: &TouchScript,
    engine: &EngineConfig,
    until_ms: Option<u64>,
    sink: &mut S,
    mut on_event: F,
) -> Result<Vec<Event>>
where
    S: FeedbackSink,
    F: FnMut(&Event),
{
    script.validate()?;
    engine.validate()?;
    let end_ms = until_ms.unwrap_or_else(|| default_end_ms(script, engine));

    let origin = Instant::now();
    let mut session = GestureSession::new(script.screen, engine);
    let mut touches = script.events.iter().peekable();
    let mut log = Vec::new();

    loop {
        let next_touch = touches.peek().map(|t| t.at_ms);
        let wake_ms = match (next_touch, session.next_deadline()) {
            (Some(t), Some(d)) => t.min(d),
            (Some(t), None) => t,
            (None, Some(d)) => d,
            (None, None) => break,
        };
        if wake_ms > end_ms {
            break;
        }

        sleep_until(origin + Duration::from_millis(wake_ms)).await;
        let now_ms = elapsed_ms(origin).max(wake_ms);

        let batch = match touches.next_if(|t| t.at_ms <= wake_ms) {
            Some(touch) => session.handle(touch, sink)?,
            None => session.poll(now_ms, sink),
        };
        for event in &batch {
            on_event(event);
        }
        log.extend(batch);
    }

    tracing::debug!(events = log.len(), "playback finished");
    Ok(log)
}

fn elapsed_ms(origin: Instant) -> u64 {
    u64::try_from(origin.elapsed().as_millis()).unwrap_or(u64::MAX)
}
