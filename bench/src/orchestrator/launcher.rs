use crate::args::options::RunOptions;
use crate::error::LoadrError;
use crate::orchestrator::handle::WorkerHandle;
use loadr_report::stats_record::StatsRecord;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;
use tracing::info;

/// Creates the execution context of one worker and submits its task.
pub trait WorkerLauncher: Send + Sync {
    fn launch(&self, index: usize, options: Arc<RunOptions>) -> Result<WorkerHandle, LoadrError>;
}

/// Runs every worker in its own child process, a re-execution of this binary in worker mode.
///
/// The child inherits stderr for its logs and prints its statistics record
/// as a JSON line on stdout. Children are killed when their handle's task is
/// dropped, so none outlives the orchestrator.
pub struct ProcessLauncher {
    executable: PathBuf,
}

impl ProcessLauncher {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    pub fn current_exe() -> Result<Self, LoadrError> {
        let executable = std::env::current_exe().map_err(LoadrError::CannotLocateExecutable)?;
        Ok(Self::new(executable))
    }
}

impl WorkerLauncher for ProcessLauncher {
    fn launch(&self, index: usize, options: Arc<RunOptions>) -> Result<WorkerHandle, LoadrError> {
        let child = Command::new(&self.executable)
            .args(options.to_worker_args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|error| LoadrError::CannotSpawnWorker(index, error))?;

        info!(
            "Worker #{} → started as process {}",
            index,
            child.id().unwrap_or_default()
        );

        let task = tokio::spawn(async move {
            let output = child
                .wait_with_output()
                .await
                .map_err(|error| LoadrError::CannotReadWorkerOutput(index, error))?;
            if !output.status.success() {
                return Err(LoadrError::WorkerCrashed {
                    index,
                    status: output.status,
                });
            }
            parse_worker_output(index, &output.stdout)
        });

        Ok(WorkerHandle::new(index, task))
    }
}

/// Reads the statistics record from the last non-empty line a worker printed.
pub fn parse_worker_output(index: usize, stdout: &[u8]) -> Result<StatsRecord, LoadrError> {
    let stdout = String::from_utf8_lossy(stdout);
    let line = stdout
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .ok_or(LoadrError::MissingWorkerOutput(index))?;
    Ok(serde_json::from_str(line.trim())?)
}
