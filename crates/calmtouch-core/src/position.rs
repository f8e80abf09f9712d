//! Normalized vertical touch position.

use serde::{Deserialize, Serialize};

/// Vertical touch position mapped into `[0, 1]`.
///
/// `0.0` is the bottom edge of the screen and `1.0` the top edge, so the
/// value grows as the finger moves up. Construction always clamps; NaN
/// collapses to `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedPosition(f64);

impl NormalizedPosition {
    pub const BOTTOM: Self = Self(0.0);
    pub const TOP: Self = Self(1.0);

    pub fn new(value: f64) -> Self {
        Self(clamp_unit(value))
    }

    /// `1 - clamp(y / screen_height, 0, 1)`.
    ///
    /// Touches captured outside the screen bounds clamp to the nearest edge.
    /// A non-positive height or a NaN coordinate maps to the bottom edge.
    pub fn from_touch(y: f64, screen_height: f64) -> Self {
        if !(screen_height > 0.0) || y.is_nan() {
            return Self::BOTTOM;
        }
        Self(1.0 - clamp_unit(y / screen_height))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// The same position seen in the given orientation frame.
    pub fn in_frame(self, orientation: Orientation) -> f64 {
        match orientation {
            Orientation::Upward => self.0,
            Orientation::Downward => 1.0 - self.0,
        }
    }
}

/// Which screen direction makes a ratio grow.
///
/// The classifier always works upward. Cadence curves and heartbeat zones
/// carry their own orientation because both conventions have shipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Ratio grows toward the top of the screen.
    #[default]
    Upward,
    /// Ratio grows toward the bottom of the screen (`y / height`).
    Downward,
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
