//! Tracing setup
//!
//! The TUI owns the terminal, so log lines go to a file. Nothing is written
//! unless `RUST_LOG` asks for it.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber if `RUST_LOG` is set
///
/// Returns true when a subscriber was installed.
pub fn init_tracing(log_file: &Path) -> Result<bool> {
    let Ok(filter) = EnvFilter::try_from_default_env() else {
        return Ok(false);
    };

    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {:?}", parent))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("Failed to open log file: {:?}", log_file))?;

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .is_ok();
    Ok(installed)
}
