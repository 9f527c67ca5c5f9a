// src/listen/stream.rs

use std::time::{Duration, Instant};

use tokio::net::UnixStream;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info};

use crate::listen::listener::SocketListener;

/// Capacity of the handoff between the accept loop and the execution loop.
///
/// One slot: the accept loop can never run more than one trigger ahead of
/// the command currently executing.
pub const HANDOFF_CAPACITY: usize = 1;

/// Pause after a failed `accept` before trying again.
pub const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// One accepted connection.
///
/// The connection carries no data. It is never read from or written to and
/// is closed by [`ConnectionEvent::dismiss`].
#[derive(Debug)]
pub struct ConnectionEvent {
    seq: u64,
    accepted_at: Instant,
    stream: UnixStream,
}

impl ConnectionEvent {
    pub fn new(seq: u64, stream: UnixStream) -> Self {
        Self {
            seq,
            accepted_at: Instant::now(),
            stream,
        }
    }

    /// 1-based position of this connection in acceptance order.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn accepted_at(&self) -> Instant {
        self.accepted_at
    }

    /// Close the connection, returning its sequence number.
    pub fn dismiss(self) -> u64 {
        let Self { seq, stream, .. } = self;
        drop(stream);
        seq
    }
}

/// Lazy, non-restartable sequence of accepted connections.
///
/// Ends once the accept loop has stopped for good (after cancellation, or
/// if the loop can no longer hand events off).
#[derive(Debug)]
pub struct ConnectionStream {
    rx: mpsc::Receiver<ConnectionEvent>,
}

impl ConnectionStream {
    /// Wrap the receiving end of a handoff channel.
    ///
    /// [`accept_stream`] is the normal constructor; this exists so other
    /// producers (e.g. tests) can feed the execution loop directly.
    pub fn from_receiver(rx: mpsc::Receiver<ConnectionEvent>) -> Self {
        Self { rx }
    }

    /// Wait for the next connection, or `None` once the stream is closed.
    pub async fn next(&mut self) -> Option<ConnectionEvent> {
        self.rx.recv().await
    }
}

/// Start accepting connections on `listener` and return them as a stream.
///
/// The accept loop runs on its own task, registered with `tracker`. Firing
/// `token` abandons any pending `accept` or handoff, closes the listener and
/// then closes the returned stream. Connections already handed off before
/// that point are still delivered.
pub fn accept_stream(
    tracker: &TaskTracker,
    token: CancellationToken,
    listener: SocketListener,
) -> ConnectionStream {
    let (tx, rx) = mpsc::channel::<ConnectionEvent>(HANDOFF_CAPACITY);
    tracker.spawn(accept_loop(listener, token, tx));
    ConnectionStream::from_receiver(rx)
}

async fn accept_loop(
    listener: SocketListener,
    token: CancellationToken,
    tx: mpsc::Sender<ConnectionEvent>,
) {
    debug!(socket = %listener.path().display(), "accept loop started");
    let mut seq: u64 = 0;

    loop {
        // Claim the handoff slot before accepting, so the next connection
        // stays in the kernel backlog while the execution loop is busy.
        let permit = tokio::select! {
            biased;
            _ = token.cancelled() => break,
            reserved = tx.reserve() => match reserved {
                Ok(permit) => permit,
                Err(_) => break,
            },
        };

        let accepted = tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = tx.closed() => break,
            res = listener.accept() => res,
        };

        match accepted {
            Ok(stream) => {
                if token.is_cancelled() {
                    debug!("dropping connection accepted during shutdown");
                    drop(stream);
                    break;
                }
                seq += 1;
                debug!(seq, "accepted connection");
                permit.send(ConnectionEvent::new(seq, stream));
            }
            Err(err) => {
                error!(error = %err, "failed to accept connection");
                drop(permit);
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = tokio::time::sleep(ACCEPT_ERROR_BACKOFF) => {}
                }
            }
        }
    }

    if token.is_cancelled() {
        info!("stop requested; no longer accepting connections");
    } else {
        info!("connection stream dropped; no longer accepting connections");
    }

    // Listener first, then the stream: the consumer must not see the end of
    // the stream while the socket is still accepting.
    listener.close();
    drop(tx);
    debug!(accepted = seq, "accept loop stopped");
}
