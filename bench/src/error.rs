use std::io;
use std::process::ExitStatus;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadrError {
    #[error("Cannot locate the loadr executable: {0}")]
    CannotLocateExecutable(#[source] io::Error),
    #[error("Cannot spawn worker #{0}: {1}")]
    CannotSpawnWorker(usize, #[source] io::Error),
    #[error("Cannot read output of worker #{0}: {1}")]
    CannotReadWorkerOutput(usize, #[source] io::Error),
    #[error("Worker #{index} exited unsuccessfully: {status}")]
    WorkerCrashed { index: usize, status: ExitStatus },
    #[error("Worker #{0} did not print a statistics record")]
    MissingWorkerOutput(usize),
    #[error("Worker #{index} task did not complete: {reason}")]
    WorkerTaskFailed { index: usize, reason: String },
    #[error("Invalid statistics record: {0}")]
    InvalidStatsRecord(#[from] serde_json::Error),
    #[error("Cannot write statistics record: {0}")]
    CannotWriteStatsRecord(#[source] io::Error),
    #[error("MQTT client error: {0}")]
    MqttClient(#[from] rumqttc::ClientError),
    #[error("MQTT connection error: {0}")]
    MqttConnection(#[from] rumqttc::ConnectionError),
    #[error("No worker statistics to aggregate")]
    NoResults,
    #[error("Still waiting for results from {remaining} process(es) after {elapsed:?}")]
    CollectionDeadlineExceeded { remaining: usize, elapsed: Duration },
    #[error("Cannot write to file: {0}")]
    CannotWriteToFile(#[source] io::Error),
}
