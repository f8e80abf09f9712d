use clap::Subcommand;
use calmtouch_core::{Config, Profile};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "preferences.vibration_intensity", "engine.cadence.floor_ms")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value (JSON for tables and arrays)
        value: String,
    },
    /// List all config values
    List,
    /// Reset config to defaults
    Reset,
    /// Replace the engine tunables with a named preset
    Profile {
        /// heartbeat or classic
        name: Profile,
    },
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => {
                    eprintln!("unknown key: {key}");
                    std::process::exit(1);
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            println!("ok");
        }
        ConfigAction::List => {
            let config = Config::load()?;
            let json = serde_json::to_string_pretty(&config)?;
            println!("{json}");
            match config.engine.matching_profile() {
                Some(profile) => eprintln!("engine profile: {profile}"),
                None => eprintln!("engine profile: custom"),
            }
        }
        ConfigAction::Reset => {
            let config = Config::default();
            config.save()?;
            println!("config reset to defaults");
        }
        ConfigAction::Profile { name } => {
            let mut config = Config::load()?;
            config.apply_profile(name);
            config.save()?;
            println!("engine profile set to {name}");
        }
    }
    Ok(())
}
