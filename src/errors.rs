// src/errors.rs

//! Crate-wide error type and result alias.
//!
//! Startup failures (`Usage`, `ConfigError`, `Bind`, `Signal`) abort the
//! daemon. Execution failures (`Spawn`, `Wait`, `CommandFailed`) are only
//! ever logged by the execution loop.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecodError {
    #[error("Usage error: {0}")]
    Usage(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("failed to bind socket at {path:?}: {source}")]
    Bind {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to register signal handler: {0}")]
    Signal(#[source] std::io::Error),

    #[error("failed to spawn {program:?}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed waiting for {program:?}: {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("command {program:?} did not succeed ({status})")]
    CommandFailed { program: String, status: ExitStatus },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ExecodError {
    /// True for errors that can only happen before the daemon starts serving.
    pub fn is_startup(&self) -> bool {
        matches!(
            self,
            ExecodError::Usage(_)
                | ExecodError::ConfigError(_)
                | ExecodError::Bind { .. }
                | ExecodError::Signal(_)
        )
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, ExecodError>;
