use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::intensity::IntensityTier;
use crate::position::NormalizedPosition;
use crate::pulse::{Beat, EchoZone};

/// Every state change in the engine produces an Event.
/// Hosts render from them; the CLI prints them as JSON lines.
///
/// `at_ms` is the host's monotonic clock, not wall time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TouchStarted {
        contact_id: Uuid,
        x: f64,
        y: f64,
        position: NormalizedPosition,
        at_ms: u64,
    },
    TouchMoved {
        contact_id: Uuid,
        position: NormalizedPosition,
        at_ms: u64,
    },
    /// Touch released (`cancelled == false`) or taken away by the system.
    TouchEnded {
        contact_id: Uuid,
        cancelled: bool,
        at_ms: u64,
    },
    /// A pulse was due. `delivered` is false for silent ticks and when the
    /// feedback sink failed.
    PulseFired {
        tier: IntensityTier,
        beat: Beat,
        delivered: bool,
        at_ms: u64,
    },
    /// The next beat was scheduled after a tick.
    TickScheduled {
        tier: IntensityTier,
        delay_ms: u64,
        due_ms: u64,
        echo: Option<EchoZone>,
        at_ms: u64,
    },
    LoopStopped {
        ticks: u64,
        pulses: u64,
        at_ms: u64,
    },
    TrailCleared {
        at_ms: u64,
    },
}

impl Event {
    pub fn at_ms(&self) -> u64 {
        match self {
            Event::TouchStarted { at_ms, .. }
            | Event::TouchMoved { at_ms, .. }
            | Event::TouchEnded { at_ms, .. }
            | Event::PulseFired { at_ms, .. }
            | Event::TickScheduled { at_ms, .. }
            | Event::LoopStopped { at_ms, .. }
            | Event::TrailCleared { at_ms } => *at_ms,
        }
    }
}
