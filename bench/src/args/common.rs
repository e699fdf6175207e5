use super::defaults::*;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use loadr_report::qos::Qos;
use std::num::NonZeroU32;
use std::str::FromStr;

#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Publish a stream of messages from parallel worker processes and capture statistics on their timing",
    long_about = None
)]
pub struct LoadrArgs {
    /// Client id of the publisher, useful for ACLs. Every worker appends its own process id
    #[arg(long, short = 'c', default_value_t = default_client_id())]
    pub clientid: String,

    /// MQTT host to connect to
    #[arg(long, short = 'H', default_value_t = DEFAULT_HOST.to_owned())]
    pub host: String,

    /// Port of the remote MQTT host
    #[arg(long, short = 'p', default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// MQTT QoS for published messages (0, 1 or 2)
    #[arg(long, short = 'q', default_value_t = DEFAULT_QOS, value_parser = Qos::from_str)]
    pub qos: Qos,

    /// How many messages every worker sends
    #[arg(long, short = 'n', alias = "msg_count", default_value_t = DEFAULT_MSG_COUNT)]
    pub msg_count: NonZeroU32,

    /// Size of messages to send in bytes, gaussian at (size, size/20) with the default payload generator
    #[arg(long, short = 's', alias = "msg_size", default_value_t = DEFAULT_MSG_SIZE)]
    pub msg_size: NonZeroU32,

    /// How many separate worker processes to spin up
    #[arg(long, short = 'P', default_value_t = DEFAULT_PROCESSES)]
    pub processes: NonZeroU32,

    /// Output directory path for storing the run report
    #[arg(long, short = 'o')]
    pub output_dir: Option<String>,

    /// Run a single worker and print its statistics as JSON on stdout
    #[arg(long, hide = true, default_value_t = false)]
    pub worker: bool,
}

impl LoadrArgs {
    pub fn validate(&self) {
        if self.host.trim().is_empty() {
            LoadrArgs::command()
                .error(ErrorKind::InvalidValue, "MQTT host cannot be empty")
                .exit();
        }

        if self.worker && self.output_dir.is_some() {
            LoadrArgs::command()
                .error(
                    ErrorKind::ArgumentConflict,
                    "--output-dir cannot be used by a worker process",
                )
                .exit();
        }
    }

    pub fn is_worker(&self) -> bool {
        self.worker
    }

    pub fn output_dir(&self) -> Option<String> {
        self.output_dir.clone()
    }

    /// Generates the report directory name based on the run parameters.
    pub fn generate_dir_name(&self) -> String {
        let parts = [
            DEFAULT_CLIENT_ID_PREFIX.to_owned(),
            self.processes.to_string(),
            self.msg_count.to_string(),
            self.msg_size.to_string(),
            format!("qos{}", self.qos),
            self.host.replace([':', '/'], "-"),
        ];

        parts.join("_")
    }
}
