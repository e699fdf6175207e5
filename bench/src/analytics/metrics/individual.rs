use loadr_report::stats_record::StatsRecord;
use loadr_report::utils::{max, mean, min, std_dev};

/// Summarizes the latencies (in milliseconds) of the confirmed messages of one run.
///
/// Every latency stands for one confirmed message, so `count_ok` is the
/// number of samples. Without samples all timings are zero.
pub fn from_latencies(client_id: &str, count_total: u64, latencies_ms: &[f64]) -> StatsRecord {
    let count_ok = (latencies_ms.len() as u64).min(count_total);

    StatsRecord::new(
        client_id,
        count_ok,
        count_total,
        mean(latencies_ms).unwrap_or(0.0),
        std_dev(latencies_ms).unwrap_or(0.0),
        min(latencies_ms).unwrap_or(0.0),
        max(latencies_ms).unwrap_or(0.0),
    )
}
