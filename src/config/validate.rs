// src/config/validate.rs

use std::ffi::OsString;
use std::os::unix::ffi::OsStrExt;

use crate::config::model::{CommandSpec, DaemonConfig, RawDaemonConfig};
use crate::errors::{ExecodError, Result};

/// Longest socket path the kernel accepts (`sun_path` minus the trailing NUL).
pub const MAX_SOCKET_PATH_BYTES: usize = 107;

impl TryFrom<RawDaemonConfig> for DaemonConfig {
    type Error = ExecodError;

    fn try_from(raw: RawDaemonConfig) -> std::result::Result<Self, Self::Error> {
        let command = validate_command(&raw.command)?;
        validate_socket_path(&raw)?;
        Ok(DaemonConfig::new_unchecked(
            raw.socket_path,
            command,
            raw.log_level,
        ))
    }
}

fn validate_command(argv: &[OsString]) -> Result<CommandSpec> {
    let command = CommandSpec::from_argv(argv).ok_or_else(|| {
        ExecodError::Usage("usage: execod <EXECUTABLE> [ARGS]...".to_string())
    })?;

    if command.program().as_bytes().trim_ascii().is_empty() {
        return Err(ExecodError::ConfigError(
            "executable must not be empty".to_string(),
        ));
    }

    Ok(command)
}

fn validate_socket_path(raw: &RawDaemonConfig) -> Result<()> {
    let bytes = raw.socket_path.as_os_str().as_bytes();

    if bytes.is_empty() {
        return Err(ExecodError::ConfigError(
            "socket path must not be empty".to_string(),
        ));
    }

    if bytes.len() > MAX_SOCKET_PATH_BYTES {
        return Err(ExecodError::ConfigError(format!(
            "socket path {:?} is {} bytes long (max {})",
            raw.socket_path,
            bytes.len(),
            MAX_SOCKET_PATH_BYTES
        )));
    }

    Ok(())
}
