// src/config/loader.rs

use std::ffi::OsString;
use std::os::unix::ffi::OsStrExt;
use std::path::PathBuf;

use crate::cli::CliArgs;
use crate::config::model::{DaemonConfig, RawDaemonConfig};
use crate::errors::Result;

/// Environment variable overriding the socket path.
pub const SOCKET_ENV: &str = "EXECOD_SOCK";

/// Environment variable selecting the log level when `--log-level` is absent.
pub const LOG_LEVEL_ENV: &str = "EXECOD_LOG";

/// Socket path used when neither `--socket` nor `EXECOD_SOCK` is given.
pub const DEFAULT_SOCKET_PATH: &str = "/tmp/execod.sock";

/// Resolve and validate the daemon configuration from the process
/// environment.
///
/// This is the only place where execod reads environment variables. Values
/// are taken as raw OS strings, so a socket path that is not valid UTF-8 is
/// still honoured.
pub fn from_env(args: &CliArgs) -> Result<DaemonConfig> {
    from_args(args, |key| std::env::var_os(key))
}

/// Resolve and validate the daemon configuration with an explicit
/// environment lookup.
///
/// Priority for the socket path:
/// 1. `--socket` CLI flag
/// 2. `EXECOD_SOCK`
/// 3. [`DEFAULT_SOCKET_PATH`]
///
/// Priority for the log level:
/// 1. `--log-level` CLI flag
/// 2. `EXECOD_LOG` (e.g. "info", "debug")
/// 3. `info`
///
/// Empty (or whitespace-only) environment values are treated as unset, and
/// so is an unparsable log level.
pub fn from_args<F>(args: &CliArgs, env: F) -> Result<DaemonConfig>
where
    F: Fn(&str) -> Option<OsString>,
{
    let lookup = |key: &str| env(key).filter(|v| !v.as_bytes().trim_ascii().is_empty());

    let socket_path = match &args.socket {
        Some(path) => path.clone(),
        None => lookup(SOCKET_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SOCKET_PATH)),
    };

    let log_level: tracing::Level = match args.log_level {
        Some(lvl) => lvl.into(),
        None => lookup(LOG_LEVEL_ENV)
            .and_then(|s| s.to_str().and_then(parse_level_str))
            .unwrap_or(tracing::Level::INFO),
    };

    let raw = RawDaemonConfig {
        socket_path,
        command: args.command.clone(),
        log_level,
    };

    DaemonConfig::try_from(raw)
}

fn parse_level_str(s: &str) -> Option<tracing::Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(tracing::Level::ERROR),
        "warn" | "warning" => Some(tracing::Level::WARN),
        "info" => Some(tracing::Level::INFO),
        "debug" => Some(tracing::Level::DEBUG),
        "trace" => Some(tracing::Level::TRACE),
        _ => None,
    }
}
