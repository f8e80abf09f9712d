mod controller;
mod plan;

pub use controller::{Beat, Deadline, LoopState, PulseLoop, TickToken};
pub use plan::{
    Echo, EchoZone, HeartbeatConfig, HighZoneEcho, LowZoneEcho, PulsePolicy, TickPlan,
};
