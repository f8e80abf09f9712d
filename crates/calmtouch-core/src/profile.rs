//! Engine tunables and the named presets that bundle them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cadence::CadenceConfig;
use crate::error::ConfigError;
use crate::gesture::TrailConfig;
use crate::intensity::ClassifierConfig;
use crate::pulse::{HeartbeatConfig, PulsePolicy};

/// Named engine presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Five tiers, zoned cadence, double beat near the top.
    Heartbeat,
    /// Three tiers, quadratic cadence growing downward, quick double tap
    /// for strong tiers.
    Classic,
}

impl Profile {
    pub const ALL: [Profile; 2] = [Profile::Heartbeat, Profile::Classic];

    pub fn name(self) -> &'static str {
        match self {
            Profile::Heartbeat => "heartbeat",
            Profile::Classic => "classic",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Profile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Profile::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::invalid("profile", format!("unknown profile '{s}' (expected heartbeat or classic)")))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub cadence: CadenceConfig,
    #[serde(default)]
    pub heartbeat: HeartbeatConfig,
    #[serde(default)]
    pub trail: TrailConfig,
}

impl EngineConfig {
    pub fn from_profile(profile: Profile) -> Self {
        match profile {
            Profile::Heartbeat => Self {
                classifier: ClassifierConfig::five_tier(),
                cadence: CadenceConfig::heartbeat(),
                heartbeat: HeartbeatConfig::high_zone(),
                trail: TrailConfig::default(),
            },
            Profile::Classic => Self {
                classifier: ClassifierConfig::three_tier(),
                cadence: CadenceConfig::quadratic(),
                heartbeat: HeartbeatConfig::low_zone(),
                trail: TrailConfig::default(),
            },
        }
    }

    /// The preset this config matches exactly, if any.
    pub fn matching_profile(&self) -> Option<Profile> {
        Profile::ALL
            .into_iter()
            .find(|p| Self::from_profile(*p) == *self)
    }

    pub fn pulse_policy(&self) -> PulsePolicy {
        PulsePolicy {
            classifier: self.classifier.clone(),
            cadence: self.cadence.clone(),
            heartbeat: self.heartbeat.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.classifier.validate()?;
        self.cadence.validate()?;
        self.heartbeat.validate(self.cadence.floor_ms)?;
        self.trail.validate()?;
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from_profile(Profile::Heartbeat)
    }
}
