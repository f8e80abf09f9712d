//! End-to-end tests for the touch-to-haptic engine through the public API.

use calmtouch_core::gesture::TrailConfig;
use calmtouch_core::{
    Beat, EngineConfig, Event, FeedbackError, FeedbackSink, GestureSession, IntensityTier,
    NormalizedPosition, Profile, RecordingSink, Screen, TouchScript,
};

/// Sink that fails every other pulse.
#[derive(Default)]
struct FlakySink {
    calls: usize,
    delivered: Vec<IntensityTier>,
}

impl FeedbackSink for FlakySink {
    fn pulse(&mut self, tier: IntensityTier) -> Result<(), FeedbackError> {
        self.calls += 1;
        if self.calls % 2 == 0 {
            return Err(FeedbackError::Rejected("busy".into()));
        }
        self.delivered.push(tier);
        Ok(())
    }
}

fn screen() -> Screen {
    Screen::new(400.0, 1000.0)
}

fn pulse_log(events: &[Event]) -> Vec<(u64, Beat)> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::PulseFired { at_ms, beat, .. } => Some((*at_ms, *beat)),
            _ => None,
        })
        .collect()
}

#[test]
fn heartbeat_zone_end_to_end() {
    let mut session = GestureSession::new(screen(), &EngineConfig::default());
    let mut sink = RecordingSink::new();

    // y = 100 of 1000 -> position 0.9.
    let mut events = session.on_touch_start(200.0, 100.0, 0, &mut sink).unwrap();
    assert!(events.iter().any(|e| matches!(
        e,
        Event::TickScheduled {
            tier: IntensityTier::Heavy,
            delay_ms: 800,
            due_ms: 800,
            ..
        }
    )));

    while let Some(due) = session.next_deadline() {
        if due > 800 {
            break;
        }
        events.extend(session.poll(due, &mut sink));
    }

    assert_eq!(
        pulse_log(&events),
        vec![(0, Beat::Primary), (120, Beat::Echo), (800, Beat::Primary)]
    );
    assert_eq!(sink.pulses(), &[IntensityTier::Heavy; 3]);
}

#[test]
fn classic_profile_uses_quadratic_cadence() {
    let engine = EngineConfig::from_profile(Profile::Classic);
    let mut session = GestureSession::new(screen(), &engine);
    let mut sink = RecordingSink::new();

    // Bottom edge: light, slowest cadence, no double tap.
    session.on_touch_start(0.0, 1000.0, 0, &mut sink).unwrap();
    assert_eq!(session.next_deadline(), Some(1400));
    session.on_touch_end(10);

    // Top edge: heavy, fastest cadence, double tap after 50ms.
    session.on_touch_start(0.0, 0.0, 100, &mut sink).unwrap();
    assert_eq!(session.pulse_loop().preview().delay.as_millis(), 250);
    assert_eq!(session.next_deadline(), Some(150));
}

#[test]
fn start_then_stop_before_first_tick_fires_nothing_more() {
    let mut session = GestureSession::new(screen(), &EngineConfig::default());
    let mut sink = RecordingSink::new();

    session.on_touch_start(200.0, 400.0, 0, &mut sink).unwrap();
    let armed = session.pulse_deadline().unwrap();
    assert_eq!(sink.len(), 1);

    session.on_touch_end(10);
    // Host timer still fires at the old deadline.
    assert!(session.fire(armed.token, armed.due_ms, &mut sink).is_empty());
    let late = session.poll(60_000, &mut sink);
    assert!(!late.iter().any(|e| matches!(e, Event::PulseFired { .. })));
    assert_eq!(sink.len(), 1);
}

#[test]
fn rapid_moves_before_first_tick_use_latest_position() {
    let mut session = GestureSession::new(screen(), &EngineConfig::default());
    let mut sink = RecordingSink::new();

    // Medium at 1500ms.
    session.on_touch_start(200.0, 400.0, 0, &mut sink).unwrap();
    for (i, y) in [950.0, 50.0, 700.0, 300.0, 880.0].into_iter().enumerate() {
        session.on_touch_move(200.0, y, 10 + i as u64);
    }
    assert_eq!(sink.len(), 1);

    sink.clear();
    let events = session.poll(1500, &mut sink);
    // y = 880 -> position 0.12 -> very light.
    assert_eq!(sink.pulses(), &[IntensityTier::VeryLight]);
    let scheduled: Vec<IntensityTier> = events
        .iter()
        .filter_map(|e| match e {
            Event::TickScheduled { tier, .. } => Some(*tier),
            _ => None,
        })
        .collect();
    assert_eq!(scheduled, vec![IntensityTier::VeryLight]);
}

#[test]
fn trail_keeps_fifteen_most_recent_points() {
    let mut session = GestureSession::new(screen(), &EngineConfig::default());
    let mut sink = RecordingSink::new();

    session.on_touch_start(0.0, 500.0, 0, &mut sink).unwrap();
    for i in 1..20u64 {
        session.on_touch_move(i as f64, 500.0, i * 45);
    }
    let xs: Vec<f64> = session.trail().iter().map(|p| p.x).collect();
    assert_eq!(xs.len(), 15);
    assert_eq!(xs.first(), Some(&5.0));
    assert_eq!(xs.last(), Some(&19.0));

    let visual = session.visual_state(19 * 45);
    assert_eq!(visual.trail.len(), 15);
    assert_eq!(visual.trail.last().map(|s| s.opacity), Some(1.0));
}

#[test]
fn trail_ages_out_while_finger_rests() {
    let engine = EngineConfig {
        trail: TrailConfig {
            max_age_ms: 300,
            ..TrailConfig::default()
        },
        ..EngineConfig::default()
    };
    let mut session = GestureSession::new(screen(), &engine);
    let mut sink = RecordingSink::new();
    session.on_touch_start(0.0, 500.0, 0, &mut sink).unwrap();
    session.on_touch_move(1.0, 500.0, 100);
    session.poll(350, &mut sink);
    assert_eq!(session.trail().len(), 1);
    assert!(session.visual_state(350).halo.is_some());
}

#[test]
fn flaky_haptics_degrade_to_visual_only() {
    let mut session = GestureSession::new(screen(), &EngineConfig::default());
    let mut sink = FlakySink::default();

    session.on_touch_start(0.0, 400.0, 0, &mut sink).unwrap();
    for t in [1500, 3000, 4500] {
        session.poll(t, &mut sink);
    }
    assert_eq!(sink.calls, 4);
    assert_eq!(sink.delivered.len(), 2);
    assert_eq!(session.pulse_loop().ticks(), 4);
    assert!(session.is_active());
}

#[test]
fn out_of_bounds_touches_stay_valid() {
    let mut session = GestureSession::new(screen(), &EngineConfig::default());
    let mut sink = RecordingSink::new();
    session.on_touch_start(0.0, -250.0, 0, &mut sink).unwrap();
    assert_eq!(session.pulse_loop().position(), NormalizedPosition::TOP);
    session.on_touch_move(0.0, 5_000.0, 10);
    assert_eq!(session.pulse_loop().position(), NormalizedPosition::BOTTOM);
    let plan = session.pulse_loop().preview();
    assert_eq!(plan.tier, IntensityTier::Silent);
    assert!(plan.delay.as_millis() >= 150);
}

#[test]
fn scripted_session_replays_deterministically() {
    let script: TouchScript = serde_json::from_str(
        r#"{
            "screen": { "width": 400, "height": 1000 },
            "events": [
                { "phase": "start", "x": 200, "y": 900, "at_ms": 0 },
                { "phase": "move", "x": 200, "y": 500, "at_ms": 200 },
                { "phase": "move", "x": 200, "y": 100, "at_ms": 400 },
                { "phase": "cancel", "at_ms": 1700 }
            ]
        }"#,
    )
    .unwrap();

    let engine = EngineConfig::default();
    let mut first = RecordingSink::new();
    let mut second = RecordingSink::new();
    let a = calmtouch_core::replay::simulate(&script, &engine, None, &mut first).unwrap();
    let b = calmtouch_core::replay::simulate(&script, &engine, None, &mut second).unwrap();

    assert_eq!(first.pulses(), second.pulses());
    assert_eq!(
        a.iter().map(Event::at_ms).collect::<Vec<_>>(),
        b.iter().map(Event::at_ms).collect::<Vec<_>>()
    );
    // The start and the 160ms tick are silent. The 320ms tick reads the
    // 0.5 move and then waits out the long mid-zone delay past the cancel.
    assert_eq!(first.pulses(), &[IntensityTier::Light]);
    assert!(a.iter().any(|e| matches!(e, Event::TouchEnded { cancelled: true, .. })));
    assert!(matches!(a.last(), Some(Event::TrailCleared { at_ms: 2200 })));
}
