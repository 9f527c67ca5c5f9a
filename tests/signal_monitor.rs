// tests/signal_monitor.rs
//
// Signals are process-wide, so these tests live in their own test binary.

use std::error::Error;
use std::process::Command;

use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use execod::signals;
use execod_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn sigterm_cancels_the_token_and_the_monitor_exits() -> TestResult {
    init_tracing();

    let token = CancellationToken::new();
    let tracker = TaskTracker::new();
    signals::spawn_monitor(&tracker, token.clone())?;
    tracker.close();

    let status = Command::new("kill")
        .args(["-TERM", &std::process::id().to_string()])
        .status()?;
    assert!(status.success());

    with_timeout(token.cancelled()).await;
    with_timeout(tracker.wait()).await;
    Ok(())
}

#[tokio::test]
async fn external_cancel_releases_the_monitor() -> TestResult {
    init_tracing();

    let token = CancellationToken::new();
    let tracker = TaskTracker::new();
    signals::spawn_monitor(&tracker, token.clone())?;
    tracker.close();

    token.cancel();
    with_timeout(tracker.wait()).await;
    assert!(tracker.is_empty());
    Ok(())
}
