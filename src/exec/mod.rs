// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running the configured command,
//! using `tokio::process::Command` with the daemon's own stdin/stdout/stderr.
//!
//! - [`backend`] provides the `CommandRunner` trait the execution loop talks
//!   to, and the production `ProcessRunner`. Tests can swap in a fake
//!   implementation.
//! - [`process`] spawns one child process and times it.

pub mod backend;
pub mod process;

pub use backend::{CommandRunner, ProcessRunner};
pub use process::run_process;
