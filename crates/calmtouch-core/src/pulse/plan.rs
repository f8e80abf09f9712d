//! What a single tick does at a given position.
//!
//! A tick fires one primary pulse and, when a heartbeat rule matches, an echo
//! pulse a short gap later. Heartbeat zones are evaluated on the cadence's
//! frame ratio so they move together with the delay curve.

use serde::{Deserialize, Serialize};

use crate::cadence::{CadenceConfig, CadenceDelay};
use crate::error::ConfigError;
use crate::intensity::{ClassifierConfig, IntensityTier};
use crate::position::NormalizedPosition;

/// Echo when the frame ratio is strictly above `above` and the tier is audible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighZoneEcho {
    #[serde(default)]
    pub enabled: bool,
    pub above: f64,
    pub gap_ms: u64,
}

/// Echo when the frame ratio is at or below `at_or_below` and the tier is
/// one of `tiers`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowZoneEcho {
    #[serde(default)]
    pub enabled: bool,
    pub at_or_below: f64,
    pub gap_ms: u64,
    pub tiers: Vec<IntensityTier>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartbeatConfig {
    pub high: HighZoneEcho,
    pub low: LowZoneEcho,
}

impl HeartbeatConfig {
    pub fn high_zone() -> Self {
        Self {
            high: HighZoneEcho {
                enabled: true,
                above: 0.7,
                gap_ms: 120,
            },
            low: LowZoneEcho {
                enabled: false,
                ..Self::low_zone().low
            },
        }
    }

    pub fn low_zone() -> Self {
        Self {
            high: HighZoneEcho {
                enabled: false,
                above: 0.7,
                gap_ms: 120,
            },
            low: LowZoneEcho {
                enabled: true,
                at_or_below: 0.5,
                gap_ms: 50,
                tiers: vec![IntensityTier::Heavy, IntensityTier::Medium],
            },
        }
    }

    pub fn disabled() -> Self {
        let mut cfg = Self::high_zone();
        cfg.high.enabled = false;
        cfg
    }

    /// Gap before the echo pulse, if any rule matches.
    pub fn echo_for(&self, frame_ratio: f64, tier: IntensityTier) -> Option<Echo> {
        if tier.is_silent() {
            return None;
        }
        if self.high.enabled && frame_ratio > self.high.above {
            return Some(Echo {
                zone: EchoZone::High,
                gap_ms: self.high.gap_ms,
            });
        }
        if self.low.enabled && frame_ratio <= self.low.at_or_below && self.low.tiers.contains(&tier) {
            return Some(Echo {
                zone: EchoZone::Low,
                gap_ms: self.low.gap_ms,
            });
        }
        None
    }

    /// Echo gaps must be positive and shorter than the cadence floor so the
    /// echo always lands before the next beat.
    pub fn validate(&self, floor_ms: u64) -> Result<(), ConfigError> {
        let rules = [
            ("engine.heartbeat.high", self.high.enabled, self.high.gap_ms, self.high.above),
            ("engine.heartbeat.low", self.low.enabled, self.low.gap_ms, self.low.at_or_below),
        ];
        for (key, enabled, gap_ms, threshold) in rules {
            if !enabled {
                continue;
            }
            if gap_ms == 0 || gap_ms >= floor_ms {
                return Err(ConfigError::invalid(
                    key,
                    format!("gap_ms ({gap_ms}) must be in 1..{floor_ms}"),
                ));
            }
            if !(0.0..=1.0).contains(&threshold) {
                return Err(ConfigError::invalid(key, format!("threshold {threshold} outside [0, 1]")));
            }
        }
        Ok(())
    }
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self::high_zone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EchoZone {
    High,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Echo {
    pub zone: EchoZone,
    pub gap_ms: u64,
}

/// The policies the pulse loop consults on every tick.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PulsePolicy {
    pub classifier: ClassifierConfig,
    pub cadence: CadenceConfig,
    pub heartbeat: HeartbeatConfig,
}

impl PulsePolicy {
    pub fn plan(&self, position: NormalizedPosition) -> TickPlan {
        let tier = self.classifier.classify(position);
        let delay = self.cadence.delay(position);
        let echo = self.heartbeat.echo_for(self.cadence.frame_ratio(position), tier);
        TickPlan {
            position,
            tier,
            delay,
            echo,
        }
    }
}

/// Outcome of one tick at a given position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickPlan {
    pub position: NormalizedPosition,
    pub tier: IntensityTier,
    pub delay: CadenceDelay,
    pub echo: Option<Echo>,
}
