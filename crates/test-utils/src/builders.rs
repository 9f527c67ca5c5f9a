use std::ffi::{OsStr, OsString};
use std::path::Path;

use execod::cli::{CliArgs, LogLevel};
use execod::config::{self, DaemonConfig};
use execod::errors::Result;

/// Builder for `DaemonConfig` to simplify test setup.
///
/// Goes through the same resolution + validation path as the binary, with an
/// empty environment unless `with_env` is used.
pub struct DaemonConfigBuilder {
    args: CliArgs,
    env: Vec<(String, OsString)>,
}

impl DaemonConfigBuilder {
    pub fn new<S: AsRef<OsStr>>(command: &[S]) -> Self {
        Self {
            args: CliArgs {
                socket: None,
                log_level: None,
                command: command.iter().map(|s| s.as_ref().to_os_string()).collect(),
            },
            env: Vec::new(),
        }
    }

    pub fn socket(mut self, path: impl AsRef<Path>) -> Self {
        self.args.socket = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.args.log_level = Some(level);
        self
    }

    pub fn with_env(mut self, key: &str, value: impl AsRef<OsStr>) -> Self {
        self.env.push((key.to_string(), value.as_ref().to_os_string()));
        self
    }

    pub fn try_build(self) -> Result<DaemonConfig> {
        let env = self.env;
        config::from_args(&self.args, |key| {
            env.iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        })
    }

    pub fn build(self) -> DaemonConfig {
        self.try_build()
            .expect("Failed to build valid config from builder")
    }
}
