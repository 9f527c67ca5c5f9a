// src/listen/listener.rs

use std::io;
use std::path::{Path, PathBuf};

use tokio::net::{UnixListener, UnixStream};
use tracing::{debug, warn};

use crate::errors::{ExecodError, Result};

/// A bound Unix socket together with the filesystem path it lives at.
///
/// Closing is exactly-once: [`SocketListener::close`] consumes the listener,
/// and the `Drop` impl only cleans up if `close` was never called.
#[derive(Debug)]
pub struct SocketListener {
    inner: UnixListener,
    path: PathBuf,
    closed: bool,
}

/// Bind a Unix socket at `path`.
///
/// Fails with [`ExecodError::Bind`] when the path already exists (a live or
/// stale socket, or any other file), when the parent directory is missing,
/// or when permissions deny it. An existing file is left untouched.
///
/// Must be called from within a Tokio runtime.
pub fn bind(path: impl AsRef<Path>) -> Result<SocketListener> {
    let path = path.as_ref();
    let inner = UnixListener::bind(path).map_err(|source| ExecodError::Bind {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(SocketListener {
        inner,
        path: path.to_path_buf(),
        closed: false,
    })
}

impl SocketListener {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Wait for the next incoming connection.
    pub async fn accept(&self) -> io::Result<UnixStream> {
        let (stream, _addr) = self.inner.accept().await?;
        Ok(stream)
    }

    /// Close the listener and remove its socket file.
    ///
    /// A failure to remove the file is logged and otherwise ignored.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(socket = %self.path.display(), "closed listener"),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(socket = %self.path.display(), "closed listener (socket file already gone)");
            }
            Err(err) => {
                warn!(
                    socket = %self.path.display(),
                    error = %err,
                    "closed listener but failed to remove socket file"
                );
            }
        }
    }
}

impl Drop for SocketListener {
    fn drop(&mut self) {
        self.release();
    }
}
