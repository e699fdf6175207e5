use crate::analytics::metrics::group::from_individual_stats;
use crate::analytics::report_builder::LoadReportBuilder;
use crate::args::common::LoadrArgs;
use crate::args::options::RunOptions;
use crate::error::LoadrError;
use crate::orchestrator::collector::ResultCollector;
use crate::orchestrator::dispatcher::Dispatcher;
use crate::orchestrator::launcher::WorkerLauncher;
use crate::orchestrator::sink::StatsSink;
use human_repr::HumanCount;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub struct LoadRunner {
    args: LoadrArgs,
    dispatcher: Dispatcher,
    collector: ResultCollector,
}

impl LoadRunner {
    pub fn new(args: LoadrArgs, launcher: Arc<dyn WorkerLauncher>) -> Self {
        Self {
            args,
            dispatcher: Dispatcher::new(launcher),
            collector: ResultCollector::default(),
        }
    }

    pub fn with_collector(mut self, collector: ResultCollector) -> Self {
        self.collector = collector;
        self
    }

    pub async fn run(self, sink: &mut dyn StatsSink) -> Result<(), LoadrError> {
        let options = Arc::new(RunOptions::from(&self.args));
        let params = options.params();
        let total_messages = params.total_messages();
        info!(
            "Starting load run: {}, {} messages each ({} total, ~{}) with QoS {} to {}:{}",
            params.format_workers_info(),
            options.msg_count,
            total_messages,
            (total_messages * options.msg_size.get() as u64).human_count_bytes(),
            options.qos,
            options.host,
            options.port
        );

        let handles = self.dispatcher.dispatch(options.clone())?;
        let collected = self.collector.collect(handles, sink).await?;
        info!("All workers finished");

        let aggregate = from_individual_stats(&collected.records).ok_or(LoadrError::NoResults)?;
        sink.emit_aggregate(&aggregate);

        if let Some(output_dir) = self.args.output_dir() {
            let report = LoadReportBuilder::build(params, collected.records, aggregate);
            let full_output_path = Path::new(&output_dir).join(self.args.generate_dir_name());
            let report_path = report
                .dump_to_json(&full_output_path)
                .map_err(LoadrError::CannotWriteToFile)?;
            info!("Report written to {}", report_path.display());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeSenderFactory, InProcessLauncher, RecordingSink};
    use clap::Parser;
    use loadr_report::report::LoadReport;
    use std::time::Duration;

    fn in_process_launcher(fail: bool) -> Arc<dyn WorkerLauncher> {
        let factory = if fail {
            FakeSenderFactory::failing()
        } else {
            FakeSenderFactory::default()
        };
        Arc::new(InProcessLauncher::new(Arc::new(factory)))
    }

    #[tokio::test]
    async fn run_should_report_every_worker_then_the_aggregate() {
        let args = LoadrArgs::parse_from(["loadr", "-c", "loadr-test", "-P", "3", "-n", "4"]);
        let runner = LoadRunner::new(args, in_process_launcher(false))
            .with_collector(ResultCollector::new(Duration::from_millis(20)));
        let mut sink = RecordingSink::default();

        runner.run(&mut sink).await.unwrap();

        assert_eq!(sink.emitted, vec![0, 1, 2]);
        assert_eq!(sink.aggregates.len(), 1);
        let aggregate = &sink.aggregates[0];
        assert_eq!(aggregate.count_total, 12);
        assert_eq!(aggregate.count_ok, 9);
        assert!((aggregate.rate_ok - 0.75).abs() < 1e-12);
        assert_eq!(aggregate.time_min, 1.0);
        assert_eq!(aggregate.time_max, 3.0);
    }

    #[tokio::test]
    async fn run_should_dump_report_to_output_dir() {
        let output_dir = std::env::temp_dir().join(format!("loadr-run-{}", uuid::Uuid::new_v4()));
        let output_dir_arg = output_dir.to_string_lossy().to_string();
        let args = LoadrArgs::parse_from([
            "loadr",
            "-c",
            "loadr-test",
            "-P",
            "2",
            "-o",
            output_dir_arg.as_str(),
        ]);
        let expected_path = output_dir
            .join(args.generate_dir_name())
            .join("report.json");
        let runner = LoadRunner::new(args, in_process_launcher(false))
            .with_collector(ResultCollector::new(Duration::from_millis(20)));
        let mut sink = RecordingSink::default();

        runner.run(&mut sink).await.unwrap();

        let report: LoadReport =
            serde_json::from_str(&std::fs::read_to_string(&expected_path).unwrap()).unwrap();
        assert_eq!(report.params.processes, 2);
        assert_eq!(report.individual_stats.len(), 2);
        assert_eq!(report.individual_stats[0].clientid, "loadr-test-1000");
        assert_eq!(report.individual_stats[1].clientid, "loadr-test-1001");
        assert_eq!(report.aggregate_stats, sink.aggregates[0]);
        std::fs::remove_dir_all(&output_dir).unwrap();
    }

    #[tokio::test]
    async fn failed_workers_should_stall_until_the_deadline() {
        let args = LoadrArgs::parse_from(["loadr", "-P", "2"]);
        let runner = LoadRunner::new(args, in_process_launcher(true)).with_collector(
            ResultCollector::new(Duration::from_millis(20)).with_deadline(Duration::from_millis(300)),
        );
        let mut sink = RecordingSink::default();

        let result = runner.run(&mut sink).await;

        assert!(matches!(
            result,
            Err(LoadrError::CollectionDeadlineExceeded { remaining: 2, .. })
        ));
        assert!(sink.aggregates.is_empty());
    }
}
