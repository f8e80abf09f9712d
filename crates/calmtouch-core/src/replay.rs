//! Deterministic replay of a touch script on a virtual clock.
//!
//! The clock jumps straight from one deadline to the next, so a ten-second
//! gesture replays instantly and always produces the same event log.
//! When a touch event and a pulse deadline share a timestamp the touch event
//! runs first: a release at `t` cancels the tick due at `t`.

use crate::error::Result;
use crate::events::Event;
use crate::feedback::FeedbackSink;
use crate::gesture::{GestureSession, TouchScript};
use crate::profile::EngineConfig;

/// Where a replay stops.
///
/// Defaults to the last touch event plus the trail grace period, which lets
/// the deferred trail clear land when the script ends with a release.
pub fn default_end_ms(script: &TouchScript, engine: &EngineConfig) -> u64 {
    script
        .last_at_ms()
        .saturating_add(engine.trail.clear_grace_ms)
}

pub fn simulate<S: FeedbackSink>(
    script: &TouchScript,
    engine: &EngineConfig,
    until_ms: Option<u64>,
    sink: &mut S,
) -> Result<Vec<Event>> {
    script.validate()?;
    engine.validate()?;
    let end_ms = until_ms.unwrap_or_else(|| default_end_ms(script, engine));

    let mut session = GestureSession::new(script.screen, engine);
    let mut events = Vec::new();

    for touch in script.events.iter().take_while(|t| t.at_ms <= end_ms) {
        drain(&mut session, touch.at_ms, false, sink, &mut events);
        events.extend(session.handle(touch, sink)?);
    }
    drain(&mut session, end_ms, true, sink, &mut events);
    Ok(events)
}

/// Polls every deadline before `limit_ms` (or at it, when `inclusive`).
fn drain<S: FeedbackSink>(
    session: &mut GestureSession,
    limit_ms: u64,
    inclusive: bool,
    sink: &mut S,
    events: &mut Vec<Event>,
) {
    while let Some(due_ms) = session.next_deadline() {
        let due = if inclusive { due_ms <= limit_ms } else { due_ms < limit_ms };
        if !due {
            break;
        }
        events.extend(session.poll(due_ms, sink));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::RecordingSink;
    use crate::gesture::{Screen, TouchEvent};
    use crate::intensity::IntensityTier;
    use crate::profile::Profile;
    use crate::pulse::Beat;

    fn pulses(events: &[Event]) -> Vec<(u64, IntensityTier, Beat)> {
        events
            .iter()
            .filter_map(|e| match e {
                Event::PulseFired { at_ms, tier, beat, .. } => Some((*at_ms, *tier, *beat)),
                _ => None,
            })
            .collect()
    }

    fn script(events: Vec<TouchEvent>) -> TouchScript {
        TouchScript {
            screen: Screen::new(400.0, 1000.0),
            events,
        }
    }

    #[test]
    fn hold_near_top_beats_like_a_heart() {
        let s = script(vec![TouchEvent::start(200.0, 100.0, 0), TouchEvent::end(1000)]);
        let mut sink = RecordingSink::new();
        let events = simulate(&s, &EngineConfig::default(), None, &mut sink).unwrap();
        assert_eq!(
            pulses(&events),
            vec![
                (0, IntensityTier::Heavy, Beat::Primary),
                (120, IntensityTier::Heavy, Beat::Echo),
                (800, IntensityTier::Heavy, Beat::Primary),
                (920, IntensityTier::Heavy, Beat::Echo),
            ]
        );
        assert!(matches!(events.last(), Some(Event::TrailCleared { at_ms: 1500 })));
    }

    #[test]
    fn release_at_deadline_wins_the_tie() {
        let s = script(vec![TouchEvent::start(200.0, 100.0, 0), TouchEvent::end(800)]);
        let mut sink = RecordingSink::new();
        let events = simulate(&s, &EngineConfig::default(), None, &mut sink).unwrap();
        assert_eq!(pulses(&events).len(), 2);
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn until_cuts_a_held_touch() {
        let s = script(vec![TouchEvent::start(200.0, 600.0, 0)]);
        let mut sink = RecordingSink::new();
        let engine = EngineConfig::from_profile(Profile::Classic);
        let events = simulate(&s, &engine, Some(2_000), &mut sink).unwrap();
        // y=600 of 1000: downward ratio 0.6 -> 250 + 0.36 * 1150 = 664ms.
        let times: Vec<u64> = pulses(&events).iter().map(|p| p.0).collect();
        assert_eq!(times, vec![0, 664, 1328, 1992]);
    }

    #[test]
    fn invalid_script_is_rejected() {
        let s = script(vec![TouchEvent::end(0)]);
        let mut sink = RecordingSink::new();
        assert!(simulate(&s, &EngineConfig::default(), None, &mut sink).is_err());
    }
}
