//! Pulse loop controller.
//!
//! A host-clocked state machine. It owns no timer: after each tick it keeps a
//! single pending slot (`next_deadline`) and the host calls back with the
//! slot's token once the deadline passes.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Idle
//! ```
//!
//! Every schedule bumps a generation counter and stamps it into the pending
//! slot's [`TickToken`]. `stop` bumps it again, so a timer callback that was
//! already in flight when the loop stopped presents a stale token and does
//! nothing.
//!
//! ## Usage
//!
//! ```ignore
//! let mut pulse = PulseLoop::new(policy);
//! pulse.start(position, now_ms, &mut sink)?;
//! // Host timer fires:
//! pulse.fire(token, now_ms, &mut sink);
//! ```

use serde::{Deserialize, Serialize};

use super::plan::{PulsePolicy, TickPlan};
use crate::error::SessionError;
use crate::events::Event;
use crate::feedback::FeedbackSink;
use crate::intensity::IntensityTier;
use crate::position::NormalizedPosition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopState {
    Idle,
    Running,
}

/// Which pulse of a tick fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Beat {
    Primary,
    Echo,
}

/// Identifies one scheduled callback. Only the newest token is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickToken(u64);

/// The pending callback a host should arm a timer for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    pub token: TickToken,
    pub due_ms: u64,
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Beat,
    /// Second pulse of a heartbeat, `gap_ms` after the primary. The next
    /// beat follows at `beat_due_ms`.
    Echo {
        tier: IntensityTier,
        gap_ms: u64,
        beat_due_ms: u64,
    },
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    token: TickToken,
    due_ms: u64,
    slot: Slot,
}

#[derive(Debug, Clone)]
pub struct PulseLoop {
    policy: PulsePolicy,
    state: LoopState,
    generation: u64,
    /// Read on every tick; written only through `start` and `update_position`.
    position: NormalizedPosition,
    pending: Option<Pending>,
    ticks: u64,
    pulses: u64,
}

impl PulseLoop {
    pub fn new(policy: PulsePolicy) -> Self {
        Self {
            policy,
            state: LoopState::Idle,
            generation: 0,
            position: NormalizedPosition::BOTTOM,
            pending: None,
            ticks: 0,
            pulses: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn position(&self) -> NormalizedPosition {
        self.position
    }

    pub fn policy(&self) -> &PulsePolicy {
        &self.policy
    }

    pub fn next_deadline(&self) -> Option<Deadline> {
        self.pending.map(|p| Deadline {
            token: p.token,
            due_ms: p.due_ms,
        })
    }

    /// Ticks since the last `start`.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Pulses the sink accepted since the last `start`.
    pub fn pulses(&self) -> u64 {
        self.pulses
    }

    /// What the next beat would do at the current position.
    pub fn preview(&self) -> TickPlan {
        self.policy.plan(self.position)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Takes effect from the next tick.
    pub fn set_policy(&mut self, policy: PulsePolicy) {
        self.policy = policy;
    }

    /// Fires the first tick immediately and schedules the next one.
    pub fn start<S: FeedbackSink>(
        &mut self,
        position: NormalizedPosition,
        now_ms: u64,
        sink: &mut S,
    ) -> Result<Vec<Event>, SessionError> {
        if self.state == LoopState::Running {
            return Err(SessionError::LoopAlreadyRunning);
        }
        self.state = LoopState::Running;
        self.position = position;
        self.ticks = 0;
        self.pulses = 0;

        let mut events = Vec::new();
        self.beat(now_ms, now_ms, sink, &mut events);
        Ok(events)
    }

    /// Moves the shared position cell. Never fires a pulse; the next tick
    /// reads the new value. Ignored while idle.
    pub fn update_position(&mut self, position: NormalizedPosition) -> bool {
        if self.state != LoopState::Running {
            return false;
        }
        self.position = position;
        true
    }

    /// Cancels the pending tick. Calling it while idle is a no-op.
    pub fn stop(&mut self, now_ms: u64) -> Option<Event> {
        if self.state == LoopState::Idle {
            return None;
        }
        self.state = LoopState::Idle;
        self.pending = None;
        self.generation += 1;
        tracing::debug!(ticks = self.ticks, pulses = self.pulses, "pulse loop stopped");
        Some(Event::LoopStopped {
            ticks: self.ticks,
            pulses: self.pulses,
            at_ms: now_ms,
        })
    }

    /// Timer callback for `token`.
    ///
    /// Stale tokens and early wake-ups are ignored.
    pub fn fire<S: FeedbackSink>(&mut self, token: TickToken, now_ms: u64, sink: &mut S) -> Vec<Event> {
        let mut events = Vec::new();
        let pending = match self.pending {
            Some(p) if p.token == token && self.state == LoopState::Running => p,
            _ => {
                tracing::debug!(?token, "ignoring stale tick");
                return events;
            }
        };
        if now_ms < pending.due_ms {
            return events;
        }
        self.pending = None;
        match pending.slot {
            Slot::Echo {
                tier,
                gap_ms,
                beat_due_ms,
            } => {
                self.deliver(tier, Beat::Echo, now_ms, sink, &mut events);
                // A late echo must not drag the next primary inside the floor.
                let floor_ms = self.policy.cadence.floor_ms;
                let earliest = now_ms.saturating_add(floor_ms.saturating_sub(gap_ms));
                self.schedule(beat_due_ms.max(earliest), Slot::Beat);
            }
            Slot::Beat => self.beat(pending.due_ms, now_ms, sink, &mut events),
        }
        events
    }

    /// Fires everything due at or before `now_ms`, in schedule order.
    pub fn poll<S: FeedbackSink>(&mut self, now_ms: u64, sink: &mut S) -> Vec<Event> {
        let mut events = Vec::new();
        while let Some(deadline) = self.next_deadline() {
            if deadline.due_ms > now_ms {
                break;
            }
            events.extend(self.fire(deadline.token, now_ms, sink));
        }
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// One tick. `base_ms` is when the beat was due; the next beat is
    /// measured from there so late wake-ups don't stretch the cadence.
    fn beat<S: FeedbackSink>(&mut self, base_ms: u64, now_ms: u64, sink: &mut S, events: &mut Vec<Event>) {
        let plan = self.policy.plan(self.position);
        self.ticks += 1;
        self.deliver(plan.tier, Beat::Primary, now_ms, sink, events);

        let delay_ms = plan.delay.as_millis();
        let mut beat_due_ms = base_ms.saturating_add(delay_ms);
        if beat_due_ms <= now_ms {
            // Fell a whole period behind; resync instead of bursting.
            beat_due_ms = now_ms.saturating_add(delay_ms);
        }
        // Catching up never brings two primaries closer than the floor.
        beat_due_ms = beat_due_ms.max(now_ms.saturating_add(self.policy.cadence.floor_ms));

        match plan.echo {
            Some(echo) => self.schedule(
                now_ms.saturating_add(echo.gap_ms),
                Slot::Echo {
                    tier: plan.tier,
                    gap_ms: echo.gap_ms,
                    beat_due_ms,
                },
            ),
            None => self.schedule(beat_due_ms, Slot::Beat),
        }

        tracing::debug!(
            position = plan.position.value(),
            tier = %plan.tier,
            delay_ms,
            due_ms = beat_due_ms,
            "tick scheduled"
        );
        events.push(Event::TickScheduled {
            tier: plan.tier,
            delay_ms,
            due_ms: beat_due_ms,
            echo: plan.echo.map(|e| e.zone),
            at_ms: now_ms,
        });
    }

    fn deliver<S: FeedbackSink>(
        &mut self,
        tier: IntensityTier,
        beat: Beat,
        now_ms: u64,
        sink: &mut S,
        events: &mut Vec<Event>,
    ) {
        let delivered = if tier.is_silent() {
            false
        } else {
            match sink.pulse(tier) {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(error = %e, %tier, "haptic pulse failed, continuing without haptics");
                    false
                }
            }
        };
        if delivered {
            self.pulses += 1;
        }
        events.push(Event::PulseFired {
            tier,
            beat,
            delivered,
            at_ms: now_ms,
        });
    }

    fn schedule(&mut self, due_ms: u64, slot: Slot) {
        self.generation += 1;
        self.pending = Some(Pending {
            token: TickToken(self.generation),
            due_ms,
            slot,
        });
    }
}
