//! Drives the engine from a JSON touch script.
//!
//! A script looks like:
//!
//! ```json
//! { "screen": { "width": 390, "height": 844 },
//!   "events": [ { "phase": "start", "x": 195, "y": 120, "at_ms": 0 },
//!               { "phase": "end", "at_ms": 2000 } ] }
//! ```

use std::path::{Path, PathBuf};

use clap::Subcommand;
use calmtouch_core::{replay, runtime, Config, EngineConfig, Profile, TouchScript, TracingSink};

#[derive(Subcommand)]
pub enum SessionAction {
    /// Replay a script on a virtual clock and print the event log as JSON
    Simulate {
        script: PathBuf,
        /// Stop at this time instead of shortly after the last touch
        #[arg(long)]
        until_ms: Option<u64>,
        /// Use a preset instead of the configured engine
        #[arg(long)]
        profile: Option<Profile>,
    },
    /// Play a script in real time, printing one JSON event per line
    Play {
        script: PathBuf,
        #[arg(long)]
        until_ms: Option<u64>,
        #[arg(long)]
        profile: Option<Profile>,
    },
}

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SessionAction::Simulate {
            script,
            until_ms,
            profile,
        } => {
            let script = load_script(&script)?;
            let engine = engine(profile)?;
            let events = replay::simulate(&script, &engine, until_ms, &mut TracingSink)?;
            println!("{}", serde_json::to_string_pretty(&events)?);
        }
        SessionAction::Play {
            script,
            until_ms,
            profile,
        } => {
            let script = load_script(&script)?;
            let engine = engine(profile)?;
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()?;
            let events = rt.block_on(runtime::play(
                &script,
                &engine,
                until_ms,
                &mut TracingSink,
                |event| match serde_json::to_string(event) {
                    Ok(line) => println!("{line}"),
                    Err(e) => tracing::warn!(error = %e, "failed to encode event"),
                },
            ))?;
            eprintln!("{} events", events.len());
        }
    }
    Ok(())
}

fn load_script(path: &Path) -> Result<TouchScript, Box<dyn std::error::Error>> {
    let script = TouchScript::load(path).map_err(|e| format!("failed to load {}: {e}", path.display()))?;
    Ok(script)
}

fn engine(profile: Option<Profile>) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    match profile {
        Some(profile) => Ok(EngineConfig::from_profile(profile)),
        None => Ok(Config::load()?.engine),
    }
}
