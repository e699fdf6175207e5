use crate::error::LoadrError;
use loadr_report::stats_record::StatsRecord;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::timeout;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleState {
    Pending,
    Ready,
    Failed,
}

#[derive(Debug)]
pub enum PollOutcome {
    /// The worker finished within the wait.
    Ready(StatsRecord),
    /// The worker failed within the wait.
    Failed(LoadrError),
    /// The wait elapsed, the worker is still running.
    Pending,
    /// The handle was already resolved by an earlier poll.
    Resolved,
}

/// The eventual result of one dispatched worker.
pub struct WorkerHandle {
    index: usize,
    state: HandleState,
    task: JoinHandle<Result<StatsRecord, LoadrError>>,
}

impl WorkerHandle {
    pub fn new(index: usize, task: JoinHandle<Result<StatsRecord, LoadrError>>) -> Self {
        Self {
            index,
            state: HandleState::Pending,
            task,
        }
    }

    /// Submission index of the worker.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn state(&self) -> HandleState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state == HandleState::Pending
    }

    /// Waits at most `wait` for the worker. A timeout leaves the worker running.
    pub async fn poll_for(&mut self, wait: Duration) -> PollOutcome {
        if !self.is_pending() {
            return PollOutcome::Resolved;
        }

        match timeout(wait, &mut self.task).await {
            Err(_) => PollOutcome::Pending,
            Ok(Ok(Ok(stats))) => {
                self.state = HandleState::Ready;
                PollOutcome::Ready(stats)
            }
            Ok(Ok(Err(error))) => {
                self.state = HandleState::Failed;
                PollOutcome::Failed(error)
            }
            Ok(Err(join_error)) => {
                self.state = HandleState::Failed;
                PollOutcome::Failed(LoadrError::WorkerTaskFailed {
                    index: self.index,
                    reason: join_error.to_string(),
                })
            }
        }
    }

    /// Stops waiting for the worker and tears down its execution context.
    pub fn abort(&self) {
        self.task.abort();
    }
}
