//! Tracing setup for the CLI.
//!
//! Events go to `$XDG_STATE_HOME/artifacts/artifacts.log`. When that file
//! cannot be opened the caller switches to stderr; stdout stays reserved for
//! command output.

use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const APP_PREFIX: &str = "artifacts";
const LOG_FILE: &str = "artifacts.log";

/// Filter used when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "info,artifacts_core=debug,artifacts=debug";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Where `init_logging` writes. Nothing is created.
pub fn log_path() -> Result<PathBuf> {
    let dirs = xdg::BaseDirectories::with_prefix(APP_PREFIX)?;
    Ok(dirs.get_state_file(LOG_FILE))
}

fn open_log(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))
}

/// Install a file subscriber and return the log path. Errors (unwritable
/// state dir, no home directory) leave no subscriber installed.
pub fn init_logging() -> Result<PathBuf> {
    let dirs = xdg::BaseDirectories::with_prefix(APP_PREFIX)?;
    let path = dirs
        .place_state_file(LOG_FILE)
        .context("create log directory")?;
    let file = open_log(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    tracing::info!(path = %path.display(), "logging initialized");
    Ok(path)
}

/// Stderr subscriber for when `init_logging` fails.
pub fn init_logging_stderr() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}
