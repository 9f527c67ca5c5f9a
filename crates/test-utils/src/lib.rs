//! Shared helpers for execod's integration tests.

pub mod builders;
pub mod fake_runner;
pub mod logs;
pub mod socket;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{fmt, EnvFilter};

/// Upper bound for any single awaited step in a socket test.
///
/// Covers a full accept → run → close round trip plus shutdown, with room
/// for a loaded CI machine.
pub const STEP_TIMEOUT: Duration = Duration::from_secs(10);

static INIT: Once = Once::new();

/// Install a global test subscriber once per test binary.
///
/// Output goes through the test writer, so it only shows for failing tests.
/// Set `RUST_LOG=execod=debug` to see the accept loop and sequencer detail.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Await `f`, panicking if it takes longer than [`STEP_TIMEOUT`].
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(STEP_TIMEOUT, f).await {
        Ok(value) => value,
        Err(_) => panic!("step did not finish within {STEP_TIMEOUT:?}"),
    }
}
