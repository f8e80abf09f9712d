//! Gesture session: bridges touch events to the pulse loop and visual state.
//!
//! One `GestureSession` lives as long as the exercise screen. Each contact
//! (touch start to end/cancel) gets its own id, restarts the pulse loop and
//! seeds a fresh trail. When the finger lifts the halo disappears at once,
//! while the trail lingers for a grace period so it can fade out.

use uuid::Uuid;

use super::touch::{Screen, TouchEvent, TouchPhase, TouchPoint};
use super::trail::{Trail, TrailConfig, TrailPoint};
use super::visual::VisualState;
use crate::error::SessionError;
use crate::events::Event;
use crate::feedback::FeedbackSink;
use crate::profile::EngineConfig;
use crate::pulse::{Deadline, PulseLoop, TickToken};

#[derive(Debug, Clone)]
pub struct GestureSession {
    screen: Screen,
    trail_config: TrailConfig,
    pulse: PulseLoop,
    contact: Option<Uuid>,
    touch: Option<TouchPoint>,
    trail: Trail,
    /// When the lingering trail should be wiped, if a contact just ended.
    trail_clear_at_ms: Option<u64>,
}

impl GestureSession {
    pub fn new(screen: Screen, engine: &EngineConfig) -> Self {
        Self {
            screen,
            trail_config: engine.trail.clone(),
            pulse: PulseLoop::new(engine.pulse_policy()),
            contact: None,
            touch: None,
            trail: Trail::new(),
            trail_clear_at_ms: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn is_active(&self) -> bool {
        self.contact.is_some()
    }

    pub fn contact_id(&self) -> Option<Uuid> {
        self.contact
    }

    pub fn touch_point(&self) -> Option<TouchPoint> {
        self.touch
    }

    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    pub fn pulse_loop(&self) -> &PulseLoop {
        &self.pulse
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// The pending pulse callback, for hosts that arm one timer per token.
    pub fn pulse_deadline(&self) -> Option<Deadline> {
        self.pulse.next_deadline()
    }

    /// Earliest time `poll` has work to do.
    pub fn next_deadline(&self) -> Option<u64> {
        let pulse = self.pulse.next_deadline().map(|d| d.due_ms);
        match (pulse, self.trail_clear_at_ms) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn visual_state(&self, now_ms: u64) -> VisualState {
        let policy = self.pulse.policy();
        let touch = self
            .touch
            .map(|point| (point, policy.classifier.classify(self.screen.position_of(point.y))));
        VisualState::build(touch, &self.trail, &self.trail_config, now_ms)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Applies new engine settings. Pulse policies apply from the next tick.
    pub fn reconfigure(&mut self, engine: &EngineConfig) {
        self.pulse.set_policy(engine.pulse_policy());
        self.trail_config = engine.trail.clone();
    }

    /// Screen rotation or resize. The next move is normalized against it.
    pub fn set_screen(&mut self, screen: Screen) {
        self.screen = screen;
    }

    pub fn on_touch_start<S: FeedbackSink>(
        &mut self,
        x: f64,
        y: f64,
        now_ms: u64,
        sink: &mut S,
    ) -> Result<Vec<Event>, SessionError> {
        if self.contact.is_some() {
            return Err(SessionError::AlreadyActive);
        }
        let position = self.screen.position_of(y);
        let contact_id = Uuid::new_v4();

        // Runs before any state changes so a rejected start leaves the
        // session untouched.
        let loop_events = self.pulse.start(position, now_ms, sink)?;

        self.contact = Some(contact_id);
        self.touch = Some(TouchPoint { x, y });
        self.trail_clear_at_ms = None;
        self.trail.clear();
        let point = self.trail_point(x, y, now_ms);
        self.trail.push(point, &self.trail_config);

        tracing::info!(%contact_id, position = position.value(), "touch started");
        let mut events = vec![Event::TouchStarted {
            contact_id,
            x,
            y,
            position,
            at_ms: now_ms,
        }];
        events.extend(loop_events);
        Ok(events)
    }

    /// Ignored when no touch is active.
    pub fn on_touch_move(&mut self, x: f64, y: f64, now_ms: u64) -> Vec<Event> {
        let Some(contact_id) = self.contact else {
            return Vec::new();
        };
        let position = self.screen.position_of(y);
        self.touch = Some(TouchPoint { x, y });
        self.pulse.update_position(position);
        let point = self.trail_point(x, y, now_ms);
        self.trail.push(point, &self.trail_config);
        vec![Event::TouchMoved {
            contact_id,
            position,
            at_ms: now_ms,
        }]
    }

    pub fn on_touch_end(&mut self, now_ms: u64) -> Vec<Event> {
        self.finish(now_ms, false)
    }

    pub fn on_touch_cancel(&mut self, now_ms: u64) -> Vec<Event> {
        self.finish(now_ms, true)
    }

    /// Dispatches a raw touch event, using its own timestamp as `now`.
    pub fn handle<S: FeedbackSink>(&mut self, event: &TouchEvent, sink: &mut S) -> Result<Vec<Event>, SessionError> {
        match event.phase {
            TouchPhase::Start => self.on_touch_start(event.x, event.y, event.at_ms, sink),
            TouchPhase::Move => Ok(self.on_touch_move(event.x, event.y, event.at_ms)),
            TouchPhase::End => Ok(self.on_touch_end(event.at_ms)),
            TouchPhase::Cancel => Ok(self.on_touch_cancel(event.at_ms)),
        }
    }

    /// Timer callback for a specific pulse token. Stale tokens do nothing.
    pub fn fire<S: FeedbackSink>(&mut self, token: TickToken, now_ms: u64, sink: &mut S) -> Vec<Event> {
        self.pulse.fire(token, now_ms, sink)
    }

    /// Runs everything due at or before `now_ms`: pulse ticks, trail aging
    /// and the deferred trail clear.
    pub fn poll<S: FeedbackSink>(&mut self, now_ms: u64, sink: &mut S) -> Vec<Event> {
        let mut events = self.pulse.poll(now_ms, sink);
        self.trail.prune(now_ms, &self.trail_config);
        if self.trail_clear_at_ms.is_some_and(|due| due <= now_ms) {
            self.trail_clear_at_ms = None;
            self.trail.clear();
            events.push(Event::TrailCleared { at_ms: now_ms });
        }
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn finish(&mut self, now_ms: u64, cancelled: bool) -> Vec<Event> {
        let Some(contact_id) = self.contact.take() else {
            return Vec::new();
        };
        let mut events = Vec::new();
        events.extend(self.pulse.stop(now_ms));
        self.touch = None;
        self.trail_clear_at_ms = Some(now_ms.saturating_add(self.trail_config.clear_grace_ms));
        tracing::info!(%contact_id, cancelled, "touch ended");
        events.push(Event::TouchEnded {
            contact_id,
            cancelled,
            at_ms: now_ms,
        });
        events
    }

    fn trail_point(&self, x: f64, y: f64, now_ms: u64) -> TrailPoint {
        let position = self.screen.position_of(y);
        TrailPoint {
            x,
            y,
            position,
            tier: self.pulse.policy().classifier.classify(position),
            at_ms: now_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::RecordingSink;
    use crate::intensity::IntensityTier;
    use crate::profile::Profile;

    fn session() -> GestureSession {
        GestureSession::new(Screen::new(400.0, 1000.0), &EngineConfig::default())
    }

    #[test]
    fn start_records_touch_and_seeds_trail() {
        let mut s = session();
        let mut sink = RecordingSink::new();
        let events = s.on_touch_start(100.0, 100.0, 0, &mut sink).unwrap();
        assert!(s.is_active());
        assert_eq!(s.touch_point(), Some(TouchPoint { x: 100.0, y: 100.0 }));
        assert_eq!(s.trail().len(), 1);
        assert!(matches!(events.first(), Some(Event::TouchStarted { .. })));
        assert_eq!(sink.pulses(), &[IntensityTier::Heavy]);
    }

    #[test]
    fn second_start_is_rejected_without_side_effects() {
        let mut s = session();
        let mut sink = RecordingSink::new();
        s.on_touch_start(100.0, 100.0, 0, &mut sink).unwrap();
        let id = s.contact_id();
        assert_eq!(s.on_touch_start(5.0, 900.0, 10, &mut sink), Err(SessionError::AlreadyActive));
        assert_eq!(s.contact_id(), id);
        assert_eq!(s.touch_point(), Some(TouchPoint { x: 100.0, y: 100.0 }));
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn move_updates_position_without_pulsing() {
        let mut s = session();
        let mut sink = RecordingSink::new();
        s.on_touch_start(0.0, 500.0, 0, &mut sink).unwrap();
        let events = s.on_touch_move(0.0, 50.0, 30);
        assert_eq!(events.len(), 1);
        assert_eq!(sink.len(), 1);
        assert!((s.pulse_loop().position().value() - 0.95).abs() < 1e-9);
        assert_eq!(s.trail().len(), 2);
    }

    #[test]
    fn move_without_touch_is_ignored() {
        let mut s = session();
        assert!(s.on_touch_move(0.0, 50.0, 30).is_empty());
        assert!(s.trail().is_empty());
    }

    #[test]
    fn end_clears_halo_now_and_trail_after_grace() {
        let mut s = session();
        let mut sink = RecordingSink::new();
        s.on_touch_start(0.0, 400.0, 0, &mut sink).unwrap();
        s.on_touch_move(0.0, 300.0, 100);
        let events = s.on_touch_end(200);
        assert!(events.iter().any(|e| matches!(e, Event::LoopStopped { .. })));
        assert!(events.iter().any(|e| matches!(e, Event::TouchEnded { cancelled: false, .. })));
        assert!(!s.is_active());
        assert!(s.visual_state(200).halo.is_none());
        assert_eq!(s.trail().len(), 2);
        assert_eq!(s.next_deadline(), Some(700));

        assert!(s.poll(699, &mut sink).is_empty());
        assert_eq!(s.trail().len(), 2);
        let events = s.poll(700, &mut sink);
        assert_eq!(events, vec![Event::TrailCleared { at_ms: 700 }]);
        assert!(s.trail().is_empty());
        assert_eq!(s.next_deadline(), None);
    }

    #[test]
    fn cancel_behaves_like_end() {
        let mut s = session();
        let mut sink = RecordingSink::new();
        s.on_touch_start(0.0, 400.0, 0, &mut sink).unwrap();
        let events = s.on_touch_cancel(10);
        assert!(events.iter().any(|e| matches!(e, Event::TouchEnded { cancelled: true, .. })));
        assert!(s.pulse_deadline().is_none());
        assert!(s.on_touch_cancel(20).is_empty());
    }

    #[test]
    fn new_touch_cancels_pending_trail_clear() {
        let mut s = session();
        let mut sink = RecordingSink::new();
        s.on_touch_start(0.0, 400.0, 0, &mut sink).unwrap();
        s.on_touch_end(100);
        s.on_touch_start(10.0, 800.0, 300, &mut sink).unwrap();
        assert_eq!(s.trail().len(), 1);
        let events = s.poll(600, &mut sink);
        assert!(!events.iter().any(|e| matches!(e, Event::TrailCleared { .. })));
        assert_eq!(s.trail().len(), 1);
    }

    #[test]
    fn stale_timer_after_end_is_ignored() {
        let mut s = session();
        let mut sink = RecordingSink::new();
        s.on_touch_start(0.0, 100.0, 0, &mut sink).unwrap();
        let deadline = s.pulse_deadline().unwrap();
        s.on_touch_end(deadline.due_ms);
        assert!(s.fire(deadline.token, deadline.due_ms, &mut sink).is_empty());
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn reconfigure_switches_policy_on_next_tick() {
        let mut s = session();
        let mut sink = RecordingSink::new();
        s.on_touch_start(0.0, 950.0, 0, &mut sink).unwrap();
        assert!(sink.is_empty());
        s.reconfigure(&EngineConfig::from_profile(Profile::Classic));
        let due = s.next_deadline().unwrap();
        s.poll(due, &mut sink);
        assert_eq!(sink.pulses(), &[IntensityTier::Light]);
    }

    #[test]
    fn visual_state_tracks_touch_tier() {
        let mut s = session();
        let mut sink = RecordingSink::new();
        s.on_touch_start(20.0, 600.0, 0, &mut sink).unwrap();
        let state = s.visual_state(0);
        let halo = state.halo.unwrap();
        assert_eq!(halo.tier, IntensityTier::Light);
        assert_eq!(state.trail.len(), 1);
    }
}
