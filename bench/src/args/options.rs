use super::common::LoadrArgs;
use loadr_report::params::RunParams;
use loadr_report::qos::Qos;
use std::num::NonZeroU32;

/// Immutable settings of one load run, shared read-only by every worker.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    pub clientid: String,
    pub host: String,
    pub port: u16,
    pub qos: Qos,
    pub msg_count: NonZeroU32,
    pub msg_size: NonZeroU32,
    pub processes: NonZeroU32,
}

impl RunOptions {
    /// Client id of the worker running in the execution context `context_id`.
    pub fn worker_client_id(&self, context_id: u32) -> String {
        format!("{}-{}", self.clientid, context_id)
    }

    /// Arguments that make a child process run exactly one worker with these options.
    pub fn to_worker_args(&self) -> Vec<String> {
        vec![
            "--worker".to_owned(),
            "--clientid".to_owned(),
            self.clientid.clone(),
            "--host".to_owned(),
            self.host.clone(),
            "--port".to_owned(),
            self.port.to_string(),
            "--qos".to_owned(),
            self.qos.to_string(),
            "--msg-count".to_owned(),
            self.msg_count.to_string(),
            "--msg-size".to_owned(),
            self.msg_size.to_string(),
        ]
    }

    pub fn params(&self) -> RunParams {
        RunParams::new(
            self.clientid.clone(),
            self.host.clone(),
            self.port,
            self.qos,
            self.msg_count.get(),
            self.msg_size.get(),
            self.processes.get(),
        )
    }
}

impl From<&LoadrArgs> for RunOptions {
    fn from(args: &LoadrArgs) -> Self {
        Self {
            clientid: args.clientid.clone(),
            host: args.host.clone(),
            port: args.port,
            qos: args.qos,
            msg_count: args.msg_count,
            msg_size: args.msg_size,
            processes: args.processes,
        }
    }
}
