mod config;

pub use config::{Config, Preferences};

use std::path::PathBuf;

/// Returns `~/.config/calmtouch[-dev]/` based on CALMTOUCH_ENV.
///
/// Set CALMTOUCH_ENV=dev to use development data directory.
/// CALMTOUCH_CONFIG_DIR, when set, wins over both.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("CALMTOUCH_CONFIG_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("CALMTOUCH_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("calmtouch-dev")
            } else {
                base_dir.join("calmtouch")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
