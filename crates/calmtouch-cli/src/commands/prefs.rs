//! Settings screen toggles, persisted in the `[preferences]` table.

use clap::{Subcommand, ValueEnum};
use calmtouch_core::Config;

#[derive(Clone, Copy, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    fn enabled(self) -> bool {
        matches!(self, Toggle::On)
    }
}

#[derive(Subcommand)]
pub enum PrefsAction {
    /// Print the current preferences
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Turn notifications on or off
    Notifications { state: Toggle },
    /// Turn vibrations on or off
    Vibrations { state: Toggle },
    /// Set the vibration intensity slider (0.0 to 1.0)
    Intensity { value: f64 },
}

pub fn run(action: PrefsAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load()?;
    match action {
        PrefsAction::Show { json } => {
            let prefs = &config.preferences;
            if json {
                println!("{}", serde_json::to_string_pretty(prefs)?);
            } else {
                println!("Notifications: {}", on_off(prefs.notifications_enabled));
                println!("Vibrations:    {}", on_off(prefs.vibrations_enabled));
                println!(
                    "Intensity:     {:.2} ({})",
                    prefs.vibration_intensity,
                    prefs.intensity_level()
                );
            }
            return Ok(());
        }
        PrefsAction::Notifications { state } => {
            config.set("preferences.notifications_enabled", &state.enabled().to_string())?;
        }
        PrefsAction::Vibrations { state } => {
            config.set("preferences.vibrations_enabled", &state.enabled().to_string())?;
        }
        PrefsAction::Intensity { value } => {
            config.set("preferences.vibration_intensity", &value.to_string())?;
        }
    }
    config.save()?;
    println!("ok");
    Ok(())
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}
