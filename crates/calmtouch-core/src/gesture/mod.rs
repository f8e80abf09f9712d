mod session;
mod touch;
mod trail;
mod visual;

pub use session::GestureSession;
pub use touch::{Screen, TouchEvent, TouchPhase, TouchPoint, TouchScript};
pub use trail::{Trail, TrailConfig, TrailPoint};
pub use visual::{halo_peak_scale, tier_color, Halo, TrailSprite, VisualState, HALO_COLOR};
