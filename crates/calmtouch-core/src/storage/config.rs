//! TOML-based application configuration.
//!
//! Stores:
//! - User preferences (notification and vibration toggles, intensity)
//! - Engine tunables (classifier bands, cadence policy, heartbeat rules, trail)
//!
//! Configuration is stored at `~/.config/calmtouch/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;
use crate::intensity::PreferenceLevel;
use crate::profile::{EngineConfig, Profile};

/// Settings screen preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub notifications_enabled: bool,
    #[serde(default)]
    pub vibrations_enabled: bool,
    #[serde(default = "default_vibration_intensity")]
    pub vibration_intensity: f64,
}

fn default_vibration_intensity() -> f64 {
    0.5
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            notifications_enabled: false,
            vibrations_enabled: false,
            vibration_intensity: default_vibration_intensity(),
        }
    }
}

impl Preferences {
    pub fn intensity_level(&self) -> PreferenceLevel {
        PreferenceLevel::from_preference(self.vibration_intensity)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.vibration_intensity) {
            return Err(ConfigError::invalid(
                "preferences.vibration_intensity",
                format!("{} outside [0, 1]", self.vibration_intensity),
            ));
        }
        Ok(())
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/calmtouch/config.toml`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub preferences: Preferences,
    #[serde(default)]
    pub engine: EngineConfig,
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = match current {
                serde_json::Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
                other => other.get(part)?,
            };
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let parts: Vec<&str> = key.split('.').collect();
        let Some((leaf, parents)) = parts.split_last() else {
            return Err(unknown());
        };
        if leaf.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        for part in parents {
            current = match current {
                serde_json::Value::Array(items) => {
                    let index = part.parse::<usize>().map_err(|_| unknown())?;
                    items.get_mut(index).ok_or_else(unknown)?
                }
                other => other.get_mut(*part).ok_or_else(unknown)?,
            };
        }

        let slot = match current {
            serde_json::Value::Array(items) => {
                let index = leaf.parse::<usize>().map_err(|_| unknown())?;
                items.get_mut(index).ok_or_else(unknown)?
            }
            serde_json::Value::Object(obj) => obj.get_mut(*leaf).ok_or_else(unknown)?,
            _ => return Err(unknown()),
        };

        let parse_err = |message: String| ConfigError::invalid(key, message);
        let new_value = match &*slot {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                value
                    .parse::<bool>()
                    .map_err(|_| parse_err(format!("cannot parse '{value}' as bool")))?,
            ),
            serde_json::Value::Number(_) => {
                if let Ok(n) = value.parse::<u64>() {
                    serde_json::Value::Number(n.into())
                } else if let Ok(n) = value.parse::<f64>() {
                    serde_json::Number::from_f64(n)
                        .map(serde_json::Value::Number)
                        .ok_or_else(|| parse_err(format!("cannot parse '{value}' as number")))?
                } else {
                    return Err(parse_err(format!("cannot parse '{value}' as number")));
                }
            }
            serde_json::Value::Object(_) | serde_json::Value::Array(_) | serde_json::Value::Null => {
                serde_json::from_str(value).map_err(|e| parse_err(e.to_string()))?
            }
            serde_json::Value::String(_) => serde_json::Value::String(value.into()),
        };
        *slot = new_value;
        Ok(())
    }

    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/calmtouch"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from the default location, writing defaults there if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::default_path()?)
    }

    /// Load from `path`, writing defaults there if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, fails
    /// validation, or the default config cannot be written.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::default_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_err = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_err(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_err(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    /// Array elements are addressed by index, e.g. `engine.classifier.bands.0.above`.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key. The change is only applied if the whole
    /// config still validates; callers persist it with `save`.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the resulting config is invalid.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::invalid(key, e.to_string()))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    pub fn apply_profile(&mut self, profile: Profile) {
        self.engine = EngineConfig::from_profile(profile);
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.preferences.validate()?;
        self.engine.validate()
    }
}
