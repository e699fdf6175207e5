use super::qos::Qos;
use derive_new::new;
use serde::{Deserialize, Serialize};

/// Options a load run was executed with, as stored in the report.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default, new)]
pub struct RunParams {
    pub clientid: String,
    pub host: String,
    pub port: u16,
    pub qos: Qos,
    pub msg_count: u32,
    pub msg_size: u32,
    pub processes: u32,
}

impl RunParams {
    pub fn total_messages(&self) -> u64 {
        self.msg_count as u64 * self.processes as u64
    }

    pub fn format_workers_info(&self) -> String {
        match self.processes {
            1 => "1 process".to_owned(),
            n => format!("{n} processes"),
        }
    }
}
