use crate::args::defaults::DEFAULT_POLL_TIMEOUT;
use crate::error::LoadrError;
use crate::orchestrator::handle::{PollOutcome, WorkerHandle};
use crate::orchestrator::sink::StatsSink;
use loadr_report::stats_record::StatsRecord;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::error;

/// What a finished collection produced.
#[derive(Debug)]
pub struct CollectedStats {
    /// Worker records in submission order.
    pub records: Vec<StatsRecord>,
    pub passes: u64,
    pub timeouts: u64,
}

/// Waits for dispatched workers in bounded increments and emits their results.
///
/// Each pass walks the pending handles in submission order and waits up to
/// `poll_timeout` on each. A handle that resolves is emitted right away and
/// the pass moves on; the first wait that times out ends the pass, and the
/// next pass starts over from the first pending handle. Results therefore
/// reach the sink in submission order, whatever order the workers finish in.
///
/// Without a deadline there is no bound on the total wait: a worker that
/// never finishes, or one that failed (failed results are never collected),
/// keeps the collection going forever.
pub struct ResultCollector {
    poll_timeout: Duration,
    deadline: Option<Duration>,
}

impl Default for ResultCollector {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_TIMEOUT)
    }
}

impl ResultCollector {
    pub fn new(poll_timeout: Duration) -> Self {
        Self {
            poll_timeout,
            deadline: None,
        }
    }

    /// Gives up once `deadline` has passed since collection started. Waits
    /// are cut short at the deadline.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Poll timeout, shortened to what is left before the deadline.
    fn next_wait(&self, started_at: Instant) -> Duration {
        match self.deadline {
            Some(deadline) => self
                .poll_timeout
                .min(deadline.saturating_sub(started_at.elapsed())),
            None => self.poll_timeout,
        }
    }

    pub async fn collect(
        &self,
        mut handles: Vec<WorkerHandle>,
        sink: &mut dyn StatsSink,
    ) -> Result<CollectedStats, LoadrError> {
        let started_at = Instant::now();
        let mut remaining = handles.len();
        let mut records = Vec::with_capacity(handles.len());
        let mut passes = 0;
        let mut timeouts = 0;

        while remaining > 0 {
            if let Some(deadline) = self.deadline {
                let elapsed = started_at.elapsed();
                if elapsed >= deadline {
                    return Err(LoadrError::CollectionDeadlineExceeded { remaining, elapsed });
                }
            }

            sink.waiting(remaining);
            passes += 1;

            let mut waited = false;
            for handle in handles.iter_mut().filter(|handle| handle.is_pending()) {
                waited = true;
                match handle.poll_for(self.next_wait(started_at)).await {
                    PollOutcome::Ready(stats) => {
                        remaining -= 1;
                        sink.emit(handle.index(), &stats);
                        records.push(stats);
                    }
                    PollOutcome::Failed(worker_error) => {
                        error!(
                            "Worker #{} failed, its result will never be collected: {worker_error}",
                            handle.index()
                        );
                    }
                    PollOutcome::Pending => {
                        timeouts += 1;
                        break;
                    }
                    PollOutcome::Resolved => {}
                }
            }

            // Only failed handles are left: nothing to wait on, keep the pace of a timeout.
            if !waited {
                sleep(self.next_wait(started_at)).await;
            }
        }

        Ok(CollectedStats {
            records,
            passes,
            timeouts,
        })
    }
}
