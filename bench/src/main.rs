use clap::Parser;
use loadr::actors::worker::run_worker_process;
use loadr::args::common::LoadrArgs;
use loadr::args::options::RunOptions;
use loadr::error::LoadrError;
use loadr::orchestrator::launcher::ProcessLauncher;
use loadr::orchestrator::sink::ConsoleSink;
use loadr::runner::LoadRunner;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), LoadrError> {
    let args = LoadrArgs::parse();
    args.validate();
    init_logging(args.is_worker());

    if args.is_worker() {
        return run_worker_process(RunOptions::from(&args)).await;
    }

    let launcher = Arc::new(ProcessLauncher::current_exe()?);
    LoadRunner::new(args, launcher)
        .run(&mut ConsoleSink)
        .await?;
    info!("Finished the load run.");
    Ok(())
}

// Worker stdout carries the statistics record, so workers log to stderr.
fn init_logging(worker: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(env_filter);
    if worker {
        subscriber.with_writer(std::io::stderr).init();
    } else {
        subscriber.init();
    }
}
