// tests/trigger_properties.rs

use proptest::prelude::*;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use execod::config::CommandSpec;
use execod::engine::RunSummary;
use execod::listen;
use execod_test_utils::fake_runner::RecordingRunner;
use execod_test_utils::socket::{connect, TempSocket};
use execod_test_utils::with_timeout;

/// Connect once per payload (writing it, if any), wait until every
/// connection has produced a run, then shut down.
fn serve_payloads(payloads: Vec<Vec<u8>>) -> (RunSummary, usize, bool) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();

    rt.block_on(async move {
        let sock = TempSocket::new();
        let listener = listen::bind(sock.path()).unwrap();
        let token = CancellationToken::new();
        let runner = RecordingRunner::new();
        let log = runner.log();

        let daemon = tokio::spawn(execod::serve(
            listener,
            CommandSpec::new("true", Vec::<String>::new()),
            runner,
            token.clone(),
            TaskTracker::new(),
        ));

        let mut clients = Vec::new();
        for payload in &payloads {
            let mut client = connect(sock.path()).await.unwrap();
            if !payload.is_empty() {
                // The daemon may already have closed us; that is fine.
                let _ = client.write_all(payload).await;
            }
            clients.push(client);
        }

        log.wait_for_finished(payloads.len()).await;
        token.cancel();
        let summary = with_timeout(daemon).await.unwrap();
        (summary, log.max_concurrent(), log.any_overlap())
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn one_run_per_connection_whatever_is_sent(
        payloads in proptest::collection::vec(
            proptest::collection::vec(any::<u8>(), 0..256),
            0..8,
        )
    ) {
        let expected = payloads.len() as u64;
        let (summary, max_concurrent, overlap) = serve_payloads(payloads);

        prop_assert_eq!(summary.triggers, expected);
        prop_assert_eq!(summary.succeeded, expected);
        prop_assert!(max_concurrent <= 1);
        prop_assert!(!overlap);
    }
}
