pub mod buffs;
pub mod config;
pub mod sequence;

use levelup_core::{Config, Event};
use std::path::Path;

/// Load the config from `path`, or from the default location.
pub fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    Ok(match path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    })
}

/// Like [`load_config`], but falls back to defaults when the default
/// location cannot be read. Used by read-only commands.
pub fn load_config_or_default(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    Ok(match path {
        Some(path) => Config::load_from(path)?,
        None => Config::load_or_default(),
    })
}

/// Print one event as a single JSON line.
pub fn print_event(event: &Event) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}

/// Single-threaded runtime; the dashboard is cooperative by construction.
pub fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
}
