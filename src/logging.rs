// src/logging.rs

//! Logging setup for `execod` using `tracing` + `tracing-subscriber`.
//!
//! The level is resolved by the config loader (`--log-level`, then
//! `EXECOD_LOG`, then `info`).
//!
//! Logs are sent to STDERR. The child process inherits the daemon's stdout,
//! which stays free for command output.

use tracing_subscriber::fmt;

use crate::errors::{Error, Result};

/// Initialise global logging subscriber.
///
/// Safe to call once at startup; a second call returns an error instead of
/// panicking.
pub fn init_logging(level: tracing::Level) -> Result<()> {
    fmt()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| Error::msg(e.to_string()))?;

    Ok(())
}
