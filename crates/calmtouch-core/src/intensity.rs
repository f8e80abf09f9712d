//! Intensity classifier.
//!
//! Maps a [`NormalizedPosition`] onto a discrete [`IntensityTier`] through
//! configurable threshold bands. Bands are checked from the highest threshold
//! down and compare with strict `>`, so a position sitting exactly on a
//! threshold lands in the next lower tier.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::position::NormalizedPosition;

/// Named vibration strength, ordered from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntensityTier {
    Silent,
    VeryLight,
    Light,
    Medium,
    Heavy,
}

impl IntensityTier {
    pub const ALL: [IntensityTier; 5] = [
        IntensityTier::Silent,
        IntensityTier::VeryLight,
        IntensityTier::Light,
        IntensityTier::Medium,
        IntensityTier::Heavy,
    ];

    /// Position in the total order, `0` for [`IntensityTier::Silent`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_silent(self) -> bool {
        self == IntensityTier::Silent
    }

    pub fn label(self) -> &'static str {
        match self {
            IntensityTier::Silent => "silent",
            IntensityTier::VeryLight => "very_light",
            IntensityTier::Light => "light",
            IntensityTier::Medium => "medium",
            IntensityTier::Heavy => "heavy",
        }
    }
}

impl std::fmt::Display for IntensityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A position strictly above `above` maps to `tier`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierBand {
    pub above: f64,
    pub tier: IntensityTier,
}

/// Threshold bands for the classifier.
///
/// `bands` are ordered by descending threshold; `fallback` applies when no
/// band matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    pub bands: Vec<TierBand>,
    pub fallback: IntensityTier,
}

impl ClassifierConfig {
    /// Silent / very light / light / medium / heavy.
    pub fn five_tier() -> Self {
        Self {
            bands: vec![
                TierBand { above: 0.75, tier: IntensityTier::Heavy },
                TierBand { above: 0.50, tier: IntensityTier::Medium },
                TierBand { above: 0.30, tier: IntensityTier::Light },
                TierBand { above: 0.10, tier: IntensityTier::VeryLight },
            ],
            fallback: IntensityTier::Silent,
        }
    }

    /// Light / medium / heavy.
    pub fn three_tier() -> Self {
        Self {
            bands: vec![
                TierBand { above: 0.66, tier: IntensityTier::Heavy },
                TierBand { above: 0.33, tier: IntensityTier::Medium },
            ],
            fallback: IntensityTier::Light,
        }
    }

    pub fn classify(&self, position: NormalizedPosition) -> IntensityTier {
        let p = position.value();
        self.bands
            .iter()
            .find(|band| p > band.above)
            .map(|band| band.tier)
            .unwrap_or(self.fallback)
    }

    /// Checks that thresholds lie in `[0, 1)`, strictly descend, and that
    /// tiers never increase going down the list. Together these keep
    /// `classify` monotonic.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut previous: Option<&TierBand> = None;
        for (i, band) in self.bands.iter().enumerate() {
            let key = format!("engine.classifier.bands.{i}");
            if !(0.0..1.0).contains(&band.above) {
                return Err(ConfigError::invalid(&key, format!("threshold {} outside [0, 1)", band.above)));
            }
            if let Some(prev) = previous {
                if band.above >= prev.above {
                    return Err(ConfigError::invalid(&key, "thresholds must strictly descend"));
                }
                if band.tier > prev.tier {
                    return Err(ConfigError::invalid(&key, "tiers must not increase as thresholds descend"));
                }
            }
            previous = Some(band);
        }
        if let Some(last) = self.bands.last() {
            if self.fallback > last.tier {
                return Err(ConfigError::invalid(
                    "engine.classifier.fallback",
                    "fallback tier must not exceed the lowest band",
                ));
            }
        }
        Ok(())
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self::five_tier()
    }
}

/// Coarse label for the user's stored vibration intensity preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferenceLevel {
    Low,
    Medium,
    High,
}

impl PreferenceLevel {
    pub fn from_preference(intensity: f64) -> Self {
        if intensity <= 0.33 {
            PreferenceLevel::Low
        } else if intensity <= 0.66 {
            PreferenceLevel::Medium
        } else {
            PreferenceLevel::High
        }
    }
}

impl std::fmt::Display for PreferenceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            PreferenceLevel::Low => "low",
            PreferenceLevel::Medium => "medium",
            PreferenceLevel::High => "high",
        })
    }
}
