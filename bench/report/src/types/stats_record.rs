use serde::{Deserialize, Serialize};

/// Success counts and latency summary of one publishing run.
///
/// A record describes either a single worker or the aggregate of several
/// workers. Timings are in milliseconds. Records are never mutated after
/// construction; derived records (like the aggregate) are built anew.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsRecord {
    pub clientid: String,
    pub count_ok: u64,
    pub count_total: u64,
    pub rate_ok: f64,
    pub time_mean: f64,
    pub time_stddev: f64,
    pub time_min: f64,
    pub time_max: f64,
}

impl StatsRecord {
    /// Builds a record, deriving `rate_ok` from the two counts.
    pub fn new(
        clientid: impl Into<String>,
        count_ok: u64,
        count_total: u64,
        time_mean: f64,
        time_stddev: f64,
        time_min: f64,
        time_max: f64,
    ) -> Self {
        Self {
            clientid: clientid.into(),
            count_ok,
            count_total,
            rate_ok: success_rate(count_ok, count_total),
            time_mean,
            time_stddev,
            time_min,
            time_max,
        }
    }

    pub fn count_failed(&self) -> u64 {
        self.count_total.saturating_sub(self.count_ok)
    }
}

pub(crate) fn success_rate(count_ok: u64, count_total: u64) -> f64 {
    if count_total == 0 {
        return 0.0;
    }
    count_ok as f64 / count_total as f64
}
