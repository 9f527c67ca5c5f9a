// tests/serve_fake_runner.rs


use std::error::Error;
use std::time::Duration;

use tokio::net::UnixStream;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use execod::config::CommandSpec;
use execod::engine::{RunSummary, Sequencer};
use execod::listen::{self, ConnectionEvent, ConnectionStream};
use execod_test_utils::fake_runner::RecordingRunner;
use execod_test_utils::socket::{connect, TempSocket};
use execod_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

fn echo_hello() -> CommandSpec {
    CommandSpec::new("echo", ["hello"])
}

#[tokio::test]
async fn every_connection_runs_exactly_once_without_overlap() -> TestResult {
    init_tracing();

    let sock = TempSocket::new();
    let listener = listen::bind(sock.path())?;
    let token = CancellationToken::new();
    let runner = RecordingRunner::new().with_delay(Duration::from_millis(30));
    let log = runner.log();

    let daemon = tokio::spawn(execod::serve(
        listener,
        echo_hello(),
        runner,
        token.clone(),
        TaskTracker::new(),
    ));

    // Keep the clients alive so closes come from the daemon side.
    let mut clients = Vec::new();
    for _ in 0..5 {
        clients.push(connect(sock.path()).await?);
    }

    log.wait_for_finished(5).await;
    token.cancel();
    let summary = with_timeout(daemon).await?;

    assert_eq!(
        summary,
        RunSummary {
            triggers: 5,
            succeeded: 5,
            failed: 0
        }
    );
    assert_eq!(log.started(), 5);
    assert_eq!(log.max_concurrent(), 1);
    assert!(!log.any_overlap());
    assert!(!sock.path().exists());
    Ok(())
}

#[tokio::test]
async fn failed_runs_do_not_stop_the_loop() -> TestResult {
    init_tracing();

    let sock = TempSocket::new();
    let listener = listen::bind(sock.path())?;
    let token = CancellationToken::new();
    let runner = RecordingRunner::new().failing_on(&[0, 2]);
    let log = runner.log();

    let daemon = tokio::spawn(execod::serve(
        listener,
        CommandSpec::new("false", Vec::<String>::new()),
        runner,
        token.clone(),
        TaskTracker::new(),
    ));

    let _first = connect(sock.path()).await?;
    log.wait_for_finished(1).await;
    let _second = connect(sock.path()).await?;
    log.wait_for_finished(2).await;
    let _third = connect(sock.path()).await?;
    log.wait_for_finished(3).await;

    token.cancel();
    let summary = with_timeout(daemon).await?;

    assert_eq!(summary.triggers, 3);
    assert_eq!(summary.failed, 2);
    assert_eq!(summary.succeeded, 1);
    Ok(())
}

#[tokio::test]
async fn cancel_while_idle_returns_promptly() -> TestResult {
    init_tracing();

    let sock = TempSocket::new();
    let listener = listen::bind(sock.path())?;
    let token = CancellationToken::new();
    let runner = RecordingRunner::new();
    let log = runner.log();

    let daemon = tokio::spawn(execod::serve(
        listener,
        echo_hello(),
        runner,
        token.clone(),
        TaskTracker::new(),
    ));

    tokio::time::sleep(Duration::from_millis(20)).await;
    token.cancel();

    let summary = tokio::time::timeout(Duration::from_secs(1), daemon).await??;
    assert_eq!(summary, RunSummary::default());
    assert_eq!(log.started(), 0);
    assert!(!sock.path().exists());
    Ok(())
}

#[tokio::test]
async fn cancel_during_a_run_lets_it_finish() -> TestResult {
    init_tracing();

    let sock = TempSocket::new();
    let listener = listen::bind(sock.path())?;
    let token = CancellationToken::new();
    let mut runner = RecordingRunner::new().with_delay(Duration::from_millis(300));
    let mut started = runner.notify_started();
    let log = runner.log();

    let daemon = tokio::spawn(execod::serve(
        listener,
        echo_hello(),
        runner,
        token.clone(),
        TaskTracker::new(),
    ));

    let _client = connect(sock.path()).await?;
    assert_eq!(with_timeout(started.recv()).await, Some(0));

    token.cancel();
    // New connections are refused once the accept loop has stopped.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(connect(sock.path()).await.is_err());

    let summary = with_timeout(daemon).await?;
    assert_eq!(summary.triggers, 1);
    assert_eq!(summary.succeeded, 1);

    let runs = log.intervals();
    assert_eq!(runs.len(), 1);
    assert!(runs[0].end - runs[0].start >= Duration::from_millis(300));
    Ok(())
}

#[tokio::test]
async fn sequencer_drains_a_prefilled_stream_in_order() -> TestResult {
    init_tracing();

    let (tx, rx) = mpsc::channel::<ConnectionEvent>(4);
    let mut peers = Vec::new();
    for seq in 1..=3 {
        let (ours, theirs) = UnixStream::pair()?;
        tx.send(ConnectionEvent::new(seq, ours)).await?;
        peers.push(theirs);
    }
    drop(tx);

    let runner = RecordingRunner::new().with_delay(Duration::from_millis(10));
    let log = runner.log();
    let sequencer = Sequencer::new(echo_hello(), runner, ConnectionStream::from_receiver(rx));

    let summary = with_timeout(sequencer.run()).await;
    assert_eq!(summary.triggers, 3);

    let order: Vec<usize> = log.intervals().iter().map(|r| r.index).collect();
    assert_eq!(order, vec![0, 1, 2]);
    assert!(!log.any_overlap());
    Ok(())
}
