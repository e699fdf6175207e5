use crate::actors::sender::{MqttSenderFactory, SenderFactory};
use crate::args::options::RunOptions;
use crate::error::LoadrError;
use human_repr::HumanCount;
use loadr_report::stats_record::StatsRecord;
use std::io::Write;
use std::sync::Arc;
use tracing::info;

/// One worker's share of a load run: a full publishing workload with its own client id.
pub struct WorkerTask {
    options: Arc<RunOptions>,
    sender_factory: Arc<dyn SenderFactory>,
}

impl WorkerTask {
    pub fn new(options: Arc<RunOptions>, sender_factory: Arc<dyn SenderFactory>) -> Self {
        Self {
            options,
            sender_factory,
        }
    }

    /// Runs the workload inside the execution context identified by `context_id`.
    pub async fn run(self, context_id: u32) -> Result<StatsRecord, LoadrError> {
        let options = &self.options;
        let client_id = options.worker_client_id(context_id);
        let message_count = options.msg_count.get();
        let message_size = options.msg_size.get();

        info!(
            "Worker {} → publishing {} messages of ~{} with QoS {} to {}:{}...",
            client_id,
            message_count,
            (message_size as u64).human_count_bytes(),
            options.qos,
            options.host,
            options.port
        );

        let mut sender = self
            .sender_factory
            .create(&options.host, options.port, &client_id);
        sender.run(message_count, message_size, options.qos).await?;
        let stats = sender.stats();

        Self::log_worker_statistics(&stats);
        Ok(stats)
    }

    fn log_worker_statistics(stats: &StatsRecord) {
        info!(
            "Worker {} → {}/{} messages confirmed ({} failed), mean latency: {:.2} ms, stddev: {:.2} ms, min: {:.2} ms, max: {:.2} ms",
            stats.clientid,
            stats.count_ok,
            stats.count_total,
            stats.count_failed(),
            stats.time_mean,
            stats.time_stddev,
            stats.time_min,
            stats.time_max
        );
    }
}

/// Entry point of a worker process: runs one task and prints its record as a JSON line.
pub async fn run_worker_process(options: RunOptions) -> Result<(), LoadrError> {
    let task = WorkerTask::new(Arc::new(options), Arc::new(MqttSenderFactory));
    let stats = task.run(std::process::id()).await?;

    let line = serde_json::to_string(&stats)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{line}").map_err(LoadrError::CannotWriteStatsRecord)?;
    stdout.flush().map_err(LoadrError::CannotWriteStatsRecord)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{run_options, FakeSenderFactory};

    #[tokio::test]
    async fn worker_should_append_context_id_to_client_id() {
        let options = Arc::new(run_options(1, 10));
        let task = WorkerTask::new(options, Arc::new(FakeSenderFactory::default()));

        let stats = task.run(4242).await.unwrap();

        assert_eq!(stats.clientid, "loadr-test-4242");
        assert_eq!(stats.count_total, 10);
        assert!(stats.count_ok <= stats.count_total);
    }

    #[tokio::test]
    async fn worker_should_fail_when_sender_fails() {
        let options = Arc::new(run_options(1, 10));
        let task = WorkerTask::new(options, Arc::new(FakeSenderFactory::failing()));

        let result = task.run(1).await;

        assert!(matches!(result, Err(LoadrError::MqttConnection(_))));
    }
}
