mod config;
pub mod database;

pub use config::{BackendConfig, Config, TimerConfig};
pub use database::Database;

use std::path::PathBuf;

/// Returns `~/.config/pomolog[-dev]/` based on POMOLOG_ENV.
///
/// Set POMOLOG_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("POMOLOG_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("pomolog-dev")
    } else {
        base_dir.join("pomolog")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
