// src/signals.rs

//! OS signal handling.
//!
//! SIGINT and SIGTERM both mean "stop": the first one to arrive cancels the
//! shared token, which lets a running command finish before the daemon
//! exits. A second SIGINT or SIGTERM after that exits the process right away
//! with `128 + signo`, without waiting for the command.

use tokio::signal::unix::{signal, Signal, SignalKind};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

use crate::errors::{ExecodError, Result};

/// Exit status used when a repeated SIGINT forces the daemon down.
pub const FORCE_EXIT_SIGINT: i32 = 130;

/// Exit status used when a repeated SIGTERM forces the daemon down.
pub const FORCE_EXIT_SIGTERM: i32 = 143;

/// Register the interrupt handlers and spawn the monitor task on `tracker`.
///
/// Registration happens before this returns, so a signal delivered right
/// after the call is not missed. If `token` is cancelled by someone else the
/// monitor exits quietly.
///
/// Once a signal has cancelled `token`, the tracked task ends and a detached
/// task keeps the handlers to catch a repeat. It is not tracked, so waiting
/// on `tracker` still completes while the last command winds down.
pub fn spawn_monitor(tracker: &TaskTracker, token: CancellationToken) -> Result<()> {
    let mut sigint = signal(SignalKind::interrupt()).map_err(ExecodError::Signal)?;
    let mut sigterm = signal(SignalKind::terminate()).map_err(ExecodError::Signal)?;

    tracker.spawn(async move {
        let name = tokio::select! {
            Some(()) = sigint.recv() => "SIGINT",
            Some(()) = sigterm.recv() => "SIGTERM",
            _ = token.cancelled() => {
                debug!("signal monitor released");
                return;
            }
        };

        info!(signal = name, "interrupt received, shutting down");
        token.cancel();
        tokio::spawn(force_exit_on_repeat(sigint, sigterm));
    });

    Ok(())
}

async fn force_exit_on_repeat(mut sigint: Signal, mut sigterm: Signal) {
    info!("send the signal again to exit without waiting");

    let (name, code) = tokio::select! {
        Some(()) = sigint.recv() => ("SIGINT", FORCE_EXIT_SIGINT),
        Some(()) = sigterm.recv() => ("SIGTERM", FORCE_EXIT_SIGTERM),
        else => return,
    };

    warn!(signal = name, code, "second interrupt received, exiting now");
    std::process::exit(code);
}
