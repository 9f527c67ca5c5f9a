// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod listen;
pub mod logging;
pub mod signals;

use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::info;

use crate::config::{CommandSpec, DaemonConfig};
use crate::engine::{RunSummary, Sequencer};
use crate::errors::Result;
use crate::exec::{CommandRunner, ProcessRunner};
use crate::listen::SocketListener;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - the socket listener
/// - SIGINT/SIGTERM handling
/// - the accept loop and the execution loop
///
/// Returns after a graceful shutdown. Errors are startup errors only.
pub async fn run(config: DaemonConfig) -> Result<RunSummary> {
    info!(command = %config.command(), "command configured");

    let listener = listen::bind(config.socket_path())?;

    let token = CancellationToken::new();
    let tracker = TaskTracker::new();

    // If this fails, `listener` is dropped here and its socket file removed.
    signals::spawn_monitor(&tracker, token.clone())?;
    info!(socket = %listener.path().display(), "listening");

    let summary = serve(
        listener,
        config.command().clone(),
        ProcessRunner::new(),
        token,
        tracker,
    )
    .await;

    Ok(summary)
}

/// Serve triggers on an already bound listener until `token` is cancelled.
///
/// The accept loop is spawned on `tracker`; the execution loop runs on the
/// caller's task. Once the connection stream has closed, `token` is
/// cancelled (a no-op if it already was) so anything else on `tracker`
/// winds down too, and every tracked task is awaited before returning.
pub async fn serve<R: CommandRunner>(
    listener: SocketListener,
    command: CommandSpec,
    runner: R,
    token: CancellationToken,
    tracker: TaskTracker,
) -> RunSummary {
    let connections = listen::accept_stream(&tracker, token.clone(), listener);
    let summary = Sequencer::new(command, runner, connections).run().await;

    token.cancel();
    tracker.close();
    tracker.wait().await;

    info!(
        triggers = summary.triggers,
        failed = summary.failed,
        "execod stopped"
    );
    summary
}
