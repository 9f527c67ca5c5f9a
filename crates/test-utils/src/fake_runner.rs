use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant, SystemTime};

use tokio::sync::mpsc;

use execod::config::CommandSpec;
use execod::engine::ExecutionRecord;
use execod::errors::ExecodError;
use execod::exec::CommandRunner;

/// Start/end of one fake execution, in call order.
#[derive(Debug, Clone, Copy)]
pub struct RunInterval {
    pub index: usize,
    pub start: Instant,
    pub end: Instant,
}

/// Shared view of what a [`RecordingRunner`] did.
#[derive(Debug, Clone, Default)]
pub struct RunLog {
    intervals: Arc<Mutex<Vec<RunInterval>>>,
    started: Arc<AtomicUsize>,
    active: Arc<AtomicUsize>,
    max_active: Arc<AtomicUsize>,
}

impl RunLog {
    /// Number of runs that have started.
    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    /// Finished runs, in the order they were started.
    pub fn intervals(&self) -> Vec<RunInterval> {
        self.intervals.lock().unwrap().clone()
    }

    /// Highest number of runs that were ever in flight at the same time.
    pub fn max_concurrent(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    /// True if some run started before the previous one had ended.
    pub fn any_overlap(&self) -> bool {
        self.intervals()
            .windows(2)
            .any(|pair| pair[1].start < pair[0].end)
    }

    /// Poll until `n` runs have finished (or panic after 5 seconds).
    pub async fn wait_for_finished(&self, n: usize) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while self.intervals.lock().unwrap().len() < n {
            assert!(
                Instant::now() < deadline,
                "timed out waiting for {n} finished runs"
            );
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

/// A fake runner that:
/// - records when each run starts and ends
/// - optionally sleeps to simulate a long-running command
/// - fails the runs whose (0-based) index is listed in `failing`
/// - optionally announces each start on a channel
pub struct RecordingRunner {
    log: RunLog,
    delay: Duration,
    failing: HashSet<usize>,
    started_tx: Option<mpsc::UnboundedSender<usize>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self {
            log: RunLog::default(),
            delay: Duration::ZERO,
            failing: HashSet::new(),
            started_tx: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn failing_on(mut self, indices: &[usize]) -> Self {
        self.failing.extend(indices.iter().copied());
        self
    }

    /// Receive the index of every run as soon as it starts.
    pub fn notify_started(&mut self) -> mpsc::UnboundedReceiver<usize> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.started_tx = Some(tx);
        rx
    }

    pub fn log(&self) -> RunLog {
        self.log.clone()
    }
}

impl Default for RecordingRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for RecordingRunner {
    fn run<'a>(
        &'a mut self,
        command: &'a CommandSpec,
    ) -> Pin<Box<dyn Future<Output = ExecutionRecord> + Send + 'a>> {
        Box::pin(async move {
            let log = &self.log;
            let index = log.started.fetch_add(1, Ordering::SeqCst);
            let now_active = log.active.fetch_add(1, Ordering::SeqCst) + 1;
            log.max_active.fetch_max(now_active, Ordering::SeqCst);

            if let Some(tx) = &self.started_tx {
                let _ = tx.send(index);
            }

            let started_at = SystemTime::now();
            let start = Instant::now();
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            let end = Instant::now();

            log.active.fetch_sub(1, Ordering::SeqCst);
            log.intervals
                .lock()
                .unwrap()
                .push(RunInterval { index, start, end });

            let outcome = if self.failing.contains(&index) {
                Err(ExecodError::Other(anyhow::anyhow!(
                    "scripted failure of {command}"
                )))
            } else {
                Ok(())
            };

            ExecutionRecord {
                started_at,
                duration: end - start,
                outcome,
            }
        })
    }
}
