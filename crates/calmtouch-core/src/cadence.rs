//! Cadence function: how long to wait before the next pulse tick.
//!
//! Two policy shapes are supported:
//!
//! - [`CadencePolicy::Quadratic`]: `min + r^2 * (max - min)`.
//! - [`CadencePolicy::Zoned`]: descending threshold zones, each with its own
//!   fixed or power-curve delay. The default zones widen the delay near the
//!   top of the screen so strong tiers beat like a heart instead of buzzing.
//!
//! `r` is the position in the cadence's own [`Orientation`] frame. Every
//! result is raised to `floor_ms`, which bounds the worst-case pulse rate.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::position::{NormalizedPosition, Orientation};

/// Delay between two pulse ticks, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CadenceDelay(u64);

impl CadenceDelay {
    pub fn from_millis(ms: u64) -> Self {
        Self(ms)
    }

    pub fn as_millis(self) -> u64 {
        self.0
    }

    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.0)
    }
}

/// Delay curve evaluated on the frame ratio `r`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DelayCurve {
    /// Constant delay.
    Fixed { ms: u64 },
    /// `base_ms + r^exponent * scale_ms`.
    Power {
        base_ms: f64,
        scale_ms: f64,
        exponent: f64,
    },
}

impl DelayCurve {
    fn eval(&self, r: f64) -> f64 {
        match *self {
            DelayCurve::Fixed { ms } => ms as f64,
            DelayCurve::Power {
                base_ms,
                scale_ms,
                exponent,
            } => base_ms + r.powf(exponent) * scale_ms,
        }
    }

    fn validate(&self, key: &str) -> Result<(), ConfigError> {
        match *self {
            DelayCurve::Fixed { ms } if ms == 0 => Err(ConfigError::invalid(key, "fixed delay must be positive")),
            DelayCurve::Fixed { .. } => Ok(()),
            DelayCurve::Power {
                base_ms,
                scale_ms,
                exponent,
            } => {
                if !(base_ms.is_finite() && scale_ms.is_finite() && exponent.is_finite()) {
                    return Err(ConfigError::invalid(key, "curve parameters must be finite"));
                }
                if base_ms < 0.0 || scale_ms < 0.0 {
                    return Err(ConfigError::invalid(key, "base_ms and scale_ms must be non-negative"));
                }
                if exponent <= 0.0 {
                    return Err(ConfigError::invalid(key, "exponent must be positive"));
                }
                Ok(())
            }
        }
    }
}

/// A frame ratio strictly above `above` uses `curve`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CadenceZone {
    pub above: f64,
    pub curve: DelayCurve,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CadencePolicy {
    Quadratic { min_ms: u64, max_ms: u64 },
    Zoned {
        zones: Vec<CadenceZone>,
        fallback: DelayCurve,
    },
}

impl CadencePolicy {
    pub fn quadratic() -> Self {
        CadencePolicy::Quadratic {
            min_ms: 250,
            max_ms: 1400,
        }
    }

    pub fn heartbeat_zones() -> Self {
        CadencePolicy::Zoned {
            zones: vec![
                CadenceZone {
                    above: 0.7,
                    curve: DelayCurve::Fixed { ms: 800 },
                },
                CadenceZone {
                    above: 0.5,
                    curve: DelayCurve::Fixed { ms: 1500 },
                },
                CadenceZone {
                    above: 0.3,
                    curve: DelayCurve::Power {
                        base_ms: 2000.0,
                        scale_ms: 3000.0,
                        exponent: 4.0,
                    },
                },
            ],
            fallback: DelayCurve::Power {
                base_ms: 150.0,
                scale_ms: 1000.0,
                exponent: 2.0,
            },
        }
    }

    fn eval(&self, r: f64) -> f64 {
        match self {
            CadencePolicy::Quadratic { min_ms, max_ms } => {
                let (min, max) = (*min_ms as f64, *max_ms as f64);
                min + r * r * (max - min)
            }
            CadencePolicy::Zoned { zones, fallback } => zones
                .iter()
                .find(|zone| r > zone.above)
                .map(|zone| &zone.curve)
                .unwrap_or(fallback)
                .eval(r),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CadenceConfig {
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default = "default_floor_ms")]
    pub floor_ms: u64,
    pub policy: CadencePolicy,
}

fn default_floor_ms() -> u64 {
    150
}

impl CadenceConfig {
    /// Quadratic 250..1400ms, growing toward the bottom of the screen.
    pub fn quadratic() -> Self {
        Self {
            orientation: Orientation::Downward,
            floor_ms: default_floor_ms(),
            policy: CadencePolicy::quadratic(),
        }
    }

    /// Heartbeat zones, same orientation as the classifier.
    pub fn heartbeat() -> Self {
        Self {
            orientation: Orientation::Upward,
            floor_ms: default_floor_ms(),
            policy: CadencePolicy::heartbeat_zones(),
        }
    }

    /// Position expressed in this cadence's frame.
    pub fn frame_ratio(&self, position: NormalizedPosition) -> f64 {
        position.in_frame(self.orientation)
    }

    pub fn delay(&self, position: NormalizedPosition) -> CadenceDelay {
        let raw = self.policy.eval(self.frame_ratio(position));
        let ms = if raw.is_finite() && raw > 0.0 {
            raw.round() as u64
        } else {
            0
        };
        CadenceDelay(ms.max(self.floor_ms))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.floor_ms == 0 {
            return Err(ConfigError::invalid("engine.cadence.floor_ms", "must be positive"));
        }
        match &self.policy {
            CadencePolicy::Quadratic { min_ms, max_ms } => {
                if min_ms > max_ms {
                    return Err(ConfigError::invalid(
                        "engine.cadence.policy",
                        format!("min_ms ({min_ms}) exceeds max_ms ({max_ms})"),
                    ));
                }
            }
            CadencePolicy::Zoned { zones, fallback } => {
                let mut previous: Option<f64> = None;
                for (i, zone) in zones.iter().enumerate() {
                    let key = format!("engine.cadence.policy.zones.{i}");
                    if !(0.0..1.0).contains(&zone.above) {
                        return Err(ConfigError::invalid(&key, format!("threshold {} outside [0, 1)", zone.above)));
                    }
                    if previous.is_some_and(|prev| zone.above >= prev) {
                        return Err(ConfigError::invalid(&key, "thresholds must strictly descend"));
                    }
                    zone.curve.validate(&key)?;
                    previous = Some(zone.above);
                }
                fallback.validate("engine.cadence.policy.fallback")?;
            }
        }
        Ok(())
    }
}

impl Default for CadenceConfig {
    fn default() -> Self {
        Self::heartbeat()
    }
}
