// src/exec/process.rs

//! Single command execution.

use std::process::Stdio;
use std::time::{Instant, SystemTime};

use tokio::process::Command;
use tracing::debug;

use crate::config::CommandSpec;
use crate::engine::ExecutionRecord;
use crate::errors::ExecodError;

/// Spawn `command` with inherited stdio, wait for it and time it.
///
/// - Spawn failure → [`ExecodError::Spawn`]
/// - Failure while waiting → [`ExecodError::Wait`]
/// - Non-zero exit or death by signal → [`ExecodError::CommandFailed`]
///
/// The child is not killed if this future is dropped; once spawned it always
/// runs to its own end.
pub async fn run_process(command: &CommandSpec) -> ExecutionRecord {
    let started_at = SystemTime::now();
    let t0 = Instant::now();
    let outcome = spawn_and_wait(command).await;

    ExecutionRecord {
        started_at,
        duration: t0.elapsed(),
        outcome,
    }
}

async fn spawn_and_wait(command: &CommandSpec) -> Result<(), ExecodError> {
    let mut child = Command::new(command.program())
        .args(command.args())
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(false)
        .spawn()
        .map_err(|source| ExecodError::Spawn {
            program: command.program_lossy(),
            source,
        })?;

    debug!(pid = ?child.id(), "command process spawned");

    let status = child.wait().await.map_err(|source| ExecodError::Wait {
        program: command.program_lossy(),
        source,
    })?;

    if status.success() {
        Ok(())
    } else {
        Err(ExecodError::CommandFailed {
            program: command.program_lossy(),
            status,
        })
    }
}
