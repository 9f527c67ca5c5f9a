// src/engine/mod.rs

//! Execution engine for execod.
//!
//! The [`sequencer`] drains the connection stream one event at a time and
//! runs the configured command once per event through a
//! [`CommandRunner`](crate::exec::CommandRunner). This module holds the
//! values that flow out of a run.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::errors::ExecodError;

pub mod sequencer;

pub use sequencer::Sequencer;

/// What happened during one command execution.
///
/// Only lives long enough to be logged and counted.
#[derive(Debug)]
pub struct ExecutionRecord {
    /// Wall-clock time at which the process was spawned.
    pub started_at: SystemTime,
    /// Elapsed wall-clock time from spawn to exit (or to the spawn failure).
    pub duration: Duration,
    /// `Ok` if the command exited successfully.
    pub outcome: Result<(), ExecodError>,
}

impl ExecutionRecord {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// `started_at` as milliseconds since the Unix epoch, for log fields.
    pub fn started_unix_ms(&self) -> u64 {
        self.started_at
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

/// Totals reported by the execution loop when it exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Connections taken off the stream (each one triggered exactly one run).
    pub triggers: u64,
    pub succeeded: u64,
    pub failed: u64,
}

impl RunSummary {
    pub fn record(&mut self, record: &ExecutionRecord) {
        self.triggers += 1;
        if record.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }
}
