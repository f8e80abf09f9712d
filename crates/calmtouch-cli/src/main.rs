use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "calmtouch-cli", version, about = "Calmtouch vibrations CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Settings screen preferences
    Prefs {
        #[command(subcommand)]
        action: commands::prefs::PrefsAction,
    },
    /// Inspect the position to tier/cadence mapping
    Map {
        #[command(subcommand)]
        action: commands::map::MapAction,
    },
    /// Run touch scripts through the engine
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
}

/// Logs go to stderr so JSON on stdout stays parseable.
/// Filter comes from CALMTOUCH_LOG, e.g. `CALMTOUCH_LOG=calmtouch_core=debug`.
fn init_logging() {
    let filter = EnvFilter::try_from_env("CALMTOUCH_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Config { action } => commands::config::run(action),
        Commands::Prefs { action } => commands::prefs::run(action),
        Commands::Map { action } => commands::map::run(action),
        Commands::Session { action } => commands::session::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
