// src/cli.rs

//! CLI argument parsing using `clap`.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `execod`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "execod",
    version,
    about = "Run a fixed command every time a client connects to a Unix socket.",
    long_about = None
)]
pub struct CliArgs {
    /// Path of the Unix socket to listen on.
    ///
    /// If omitted, `EXECOD_SOCK` or `/tmp/execod.sock` is used.
    #[arg(long, value_name = "PATH")]
    pub socket: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `EXECOD_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Executable to run on every connection, followed by its arguments.
    ///
    /// Everything after the executable is passed through untouched, flags
    /// and non-UTF-8 bytes included.
    #[arg(
        value_name = "EXECUTABLE",
        required = true,
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<OsString>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing::Level {
    fn from(lvl: LogLevel) -> Self {
        match lvl {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
///
/// Exits the process with clap's usage status when the arguments are bad.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

/// Parse from an explicit argument list (first item is the binary name).
pub fn try_parse_from<I, T>(args: I) -> Result<CliArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    CliArgs::try_parse_from(args)
}
