// src/exec/backend.rs

//! Pluggable command runner abstraction.
//!
//! The execution loop talks to a `CommandRunner` instead of spawning
//! processes itself. This makes it easy to swap in a fake runner in tests
//! while keeping the production implementation in [`process`](super::process).

use std::future::Future;
use std::pin::Pin;

use crate::config::CommandSpec;
use crate::engine::ExecutionRecord;

use super::process::run_process;

/// Trait abstracting how one execution of the command happens.
///
/// The returned future must only resolve once the execution is over; the
/// execution loop relies on that to keep runs from overlapping.
pub trait CommandRunner: Send {
    fn run<'a>(
        &'a mut self,
        command: &'a CommandSpec,
    ) -> Pin<Box<dyn Future<Output = ExecutionRecord> + Send + 'a>>;
}

/// Real runner used in production: spawns the command as a child process
/// sharing the daemon's stdio.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for ProcessRunner {
    fn run<'a>(
        &'a mut self,
        command: &'a CommandSpec,
    ) -> Pin<Box<dyn Future<Output = ExecutionRecord> + Send + 'a>> {
        Box::pin(run_process(command))
    }
}
