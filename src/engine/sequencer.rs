// src/engine/sequencer.rs

use tracing::{debug, error, info};

use crate::config::CommandSpec;
use crate::engine::{ExecutionRecord, RunSummary};
use crate::exec::CommandRunner;
use crate::listen::ConnectionStream;

/// The daemon's main loop.
///
/// Takes one connection at a time off the stream, closes it, and runs the
/// command to completion before looking at the next one. No run can start
/// while another is still in flight; the runner shares the daemon's stdio
/// with the child, so overlapping runs are never allowed.
pub struct Sequencer<R: CommandRunner> {
    command: CommandSpec,
    runner: R,
    connections: ConnectionStream,
}

impl<R: CommandRunner> std::fmt::Debug for Sequencer<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sequencer")
            .field("command", &self.command)
            .finish_non_exhaustive()
    }
}

impl<R: CommandRunner> Sequencer<R> {
    pub fn new(command: CommandSpec, runner: R, connections: ConnectionStream) -> Self {
        Self {
            command,
            runner,
            connections,
        }
    }

    /// Main loop.
    ///
    /// - Waits for the next connection (or the end of the stream).
    /// - Closes the connection without reading from it.
    /// - Runs the command and logs the outcome; failures never stop the loop.
    ///
    /// Returns once the connection stream has closed, which only happens
    /// after the accept loop has shut down.
    pub async fn run(mut self) -> RunSummary {
        info!(command = %self.command, "execution loop started");
        let mut summary = RunSummary::default();

        while let Some(event) = self.connections.next().await {
            let waited = event.accepted_at().elapsed();
            let seq = event.dismiss();
            debug!(seq, queued = ?waited, "received new request");

            info!(seq, "running command");
            let record = self.runner.run(&self.command).await;
            log_record(seq, &record);
            summary.record(&record);
        }

        info!(
            triggers = summary.triggers,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "connection stream closed; execution loop exiting"
        );
        summary
    }
}

fn log_record(seq: u64, record: &ExecutionRecord) {
    match &record.outcome {
        Ok(()) => info!(
            seq,
            started_unix_ms = record.started_unix_ms(),
            runtime = ?record.duration,
            "command run successfully"
        ),
        Err(err) => error!(
            seq,
            started_unix_ms = record.started_unix_ms(),
            runtime = ?record.duration,
            error = %err,
            "command failed"
        ),
    }
}
