// src/config/model.rs

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};

/// The external command run on every trigger.
///
/// Built once at startup and only ever read afterwards. Program and
/// arguments are kept as raw OS strings and handed to the child unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: OsString,
    args: Vec<OsString>,
}

impl CommandSpec {
    pub fn new<P, I, A>(program: P, args: I) -> Self
    where
        P: Into<OsString>,
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Split an argv-style list into program and arguments.
    ///
    /// Returns `None` for an empty list.
    pub fn from_argv(argv: &[OsString]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self::new(program.clone(), args.iter().cloned()))
    }

    pub fn program(&self) -> &OsStr {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Program name for logs and error messages.
    pub fn program_lossy(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg:?}")?;
        }
        Ok(())
    }
}

/// Configuration as assembled from CLI + environment, before validation.
#[derive(Debug, Clone)]
pub struct RawDaemonConfig {
    pub socket_path: PathBuf,
    pub command: Vec<OsString>,
    pub log_level: tracing::Level,
}

/// Validated daemon configuration.
///
/// Only obtainable through `DaemonConfig::try_from(RawDaemonConfig)`, which
/// runs the checks in `validate.rs`.
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    socket_path: PathBuf,
    command: CommandSpec,
    log_level: tracing::Level,
}

impl DaemonConfig {
    pub(crate) fn new_unchecked(
        socket_path: PathBuf,
        command: CommandSpec,
        log_level: tracing::Level,
    ) -> Self {
        Self {
            socket_path,
            command,
            log_level,
        }
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    pub fn command(&self) -> &CommandSpec {
        &self.command
    }

    pub fn log_level(&self) -> tracing::Level {
        self.log_level
    }
}
