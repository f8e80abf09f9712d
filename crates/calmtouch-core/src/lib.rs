//! # calmtouch Core Library
//!
//! Touch-to-haptic engine for the "Vibrations" grounding exercise: a held
//! finger's vertical position sets how strongly and how often the device
//! pulses, while a fading trail follows the finger on screen.
//!
//! ## Architecture
//!
//! - **Intensity classifier**: position to discrete tier, via threshold bands
//! - **Cadence**: position to delay before the next pulse
//! - **Pulse loop**: a host-clocked state machine with a single pending tick
//!   guarded by a generation token
//! - **Gesture session**: touch start/move/end, trail and visual state
//! - **Storage**: TOML configuration (preferences and engine tunables)
//!
//! The engine owns no threads or timers. Hosts call `poll()` (or `fire()`
//! with a token) when `next_deadline()` passes; [`runtime::play`] does this
//! on a tokio timer and [`replay::simulate`] on a virtual clock.
//!
//! ## Key Components
//!
//! - [`GestureSession`]: per-screen touch handling
//! - [`PulseLoop`]: self-rescheduling pulse state machine
//! - [`FeedbackSink`]: haptic capability supplied by the host
//! - [`Config`]: application configuration management

pub mod cadence;
pub mod error;
pub mod events;
pub mod feedback;
pub mod gesture;
pub mod intensity;
pub mod position;
pub mod profile;
pub mod pulse;
pub mod replay;
pub mod runtime;
pub mod storage;

pub use cadence::{CadenceConfig, CadenceDelay, CadencePolicy, CadenceZone, DelayCurve};
pub use error::{ConfigError, CoreError, FeedbackError, SessionError, ValidationError};
pub use events::Event;
pub use feedback::{FeedbackSink, NullSink, RecordingSink, TracingSink, UnavailableSink};
pub use gesture::{GestureSession, Screen, TouchEvent, TouchPhase, TouchScript, VisualState};
pub use intensity::{ClassifierConfig, IntensityTier, PreferenceLevel, TierBand};
pub use position::{NormalizedPosition, Orientation};
pub use profile::{EngineConfig, Profile};
pub use pulse::{Beat, HeartbeatConfig, LoopState, PulseLoop, PulsePolicy, TickPlan};
pub use storage::{Config, Preferences};
