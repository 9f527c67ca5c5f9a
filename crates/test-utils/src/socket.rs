//! Client-side helpers for talking to a daemon socket.

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tempfile::TempDir;
use tokio::io::AsyncReadExt;
use tokio::net::UnixStream;

use crate::STEP_TIMEOUT;

/// A socket path inside a fresh temporary directory.
///
/// The directory, and anything left in it, is removed on drop.
pub struct TempSocket {
    _dir: TempDir,
    path: PathBuf,
}

impl TempSocket {
    pub fn new() -> Self {
        Self::named("execod.sock")
    }

    /// Same as [`TempSocket::new`] with a caller-chosen file name.
    pub fn named(name: impl AsRef<Path>) -> Self {
        let dir = tempfile::Builder::new()
            .prefix("execod")
            .tempdir()
            .expect("create temp dir");
        let path = dir.path().join(name);
        Self { _dir: dir, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for TempSocket {
    fn default() -> Self {
        Self::new()
    }
}

/// Connect to the daemon socket. Connecting is the whole trigger.
pub async fn connect(path: &Path) -> io::Result<UnixStream> {
    UnixStream::connect(path).await
}

/// Wait until the daemon has closed our connection.
///
/// A close with unread data shows up as a reset rather than EOF, so any read
/// error counts as closed too.
pub async fn wait_closed(stream: &mut UnixStream) -> bool {
    let mut buf = [0u8; 64];
    match tokio::time::timeout(STEP_TIMEOUT, stream.read(&mut buf)).await {
        Ok(Ok(0)) | Ok(Err(_)) => true,
        Ok(Ok(_)) | Err(_) => false,
    }
}

/// True if no close is observed on `stream` within `within`.
pub async fn still_open(stream: &mut UnixStream, within: Duration) -> bool {
    let mut buf = [0u8; 64];
    tokio::time::timeout(within, stream.read(&mut buf))
        .await
        .is_err()
}

/// Block until `path` exists, panicking after `limit`.
pub fn wait_for_path(path: &Path, limit: Duration) {
    let deadline = Instant::now() + limit;
    while !path.exists() {
        assert!(Instant::now() < deadline, "{path:?} did not appear");
        std::thread::sleep(Duration::from_millis(20));
    }
}
