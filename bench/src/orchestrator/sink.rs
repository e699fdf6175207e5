use colored::Color;
use loadr_report::stats_record::StatsRecord;
use tracing::info;

/// Receives collection progress and statistics as they become available.
pub trait StatsSink: Send {
    fn waiting(&mut self, remaining: usize) {
        info!("Still waiting for results from {remaining} process(es)");
    }

    /// Result of the worker submitted at `index`.
    fn emit(&mut self, index: usize, stats: &StatsRecord);

    fn emit_aggregate(&mut self, stats: &StatsRecord);
}

/// Prints every record on stdout: workers in green, the aggregate in red.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl StatsSink for ConsoleSink {
    fn emit(&mut self, _index: usize, stats: &StatsRecord) {
        println!("{}\n", stats.formatted_string(Color::Green));
    }

    fn emit_aggregate(&mut self, stats: &StatsRecord) {
        println!("{}\n", stats.formatted_string(Color::Red));
    }
}
