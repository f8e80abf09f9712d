use clap::{Args, Subcommand};
use calmtouch_core::{Config, EngineConfig, NormalizedPosition, Profile, PulsePolicy, TickPlan};

#[derive(Args)]
pub struct EngineArgs {
    /// Use a preset instead of the configured engine
    #[arg(long)]
    profile: Option<Profile>,
}

impl EngineArgs {
    fn engine(&self) -> Result<EngineConfig, Box<dyn std::error::Error>> {
        match self.profile {
            Some(profile) => Ok(EngineConfig::from_profile(profile)),
            None => Ok(Config::load()?.engine),
        }
    }
}

#[derive(Subcommand)]
pub enum MapAction {
    /// Intensity tier for a position (0.0 bottom, 1.0 top)
    Tier {
        position: f64,
        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Delay before the next pulse for a position, in ms
    Delay {
        position: f64,
        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Tier, delay and echo for evenly spaced positions
    Table {
        /// Number of intervals between bottom and top
        #[arg(long, default_value = "10")]
        steps: u32,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        engine: EngineArgs,
    },
}

pub fn run(action: MapAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        MapAction::Tier { position, engine } => {
            let policy = engine.engine()?.pulse_policy();
            println!("{}", policy.plan(NormalizedPosition::new(position)).tier);
        }
        MapAction::Delay { position, engine } => {
            let policy = engine.engine()?.pulse_policy();
            println!("{}", policy.plan(NormalizedPosition::new(position)).delay.as_millis());
        }
        MapAction::Table { steps, json, engine } => {
            if steps == 0 {
                return Err("steps must be at least 1".into());
            }
            let rows = table(&engine.engine()?.pulse_policy(), steps);
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                println!("{:>8}  {:<10}  {:>8}  echo", "position", "tier", "delay_ms");
                for row in &rows {
                    let echo = match row.echo {
                        Some(echo) => format!("+{}ms", echo.gap_ms),
                        None => "-".to_string(),
                    };
                    println!(
                        "{:>8.2}  {:<10}  {:>8}  {echo}",
                        row.position.value(),
                        row.tier.label(),
                        row.delay.as_millis()
                    );
                }
            }
        }
    }
    Ok(())
}

fn table(policy: &PulsePolicy, steps: u32) -> Vec<TickPlan> {
    (0..=steps)
        .map(|i| policy.plan(NormalizedPosition::new(f64::from(i) / f64::from(steps))))
        .collect()
}
