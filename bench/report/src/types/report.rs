use crate::types::params::RunParams;
use crate::types::stats_record::StatsRecord;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LoadReport {
    /// Run unique identifier
    pub uuid: Uuid,

    /// Timestamp when the run was finished
    pub timestamp: String,

    /// Run parameters
    pub params: RunParams,

    /// Per worker statistics, in submission order
    pub individual_stats: Vec<StatsRecord>,

    /// Simple average over all workers
    pub aggregate_stats: StatsRecord,
}

impl LoadReport {
    /// Writes `report.json` into `output_dir`, creating the directory if needed.
    pub fn dump_to_json(&self, output_dir: &Path) -> io::Result<PathBuf> {
        std::fs::create_dir_all(output_dir)?;

        let report_path = output_dir.join("report.json");
        let report_json = serde_json::to_string_pretty(self)?;
        std::fs::write(&report_path, report_json)?;
        Ok(report_path)
    }
}
