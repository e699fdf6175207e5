use loadr_report::stats_record::StatsRecord;
use loadr_report::utils::mean;

/// Combines per worker statistics into one aggregate record.
///
/// Counts are summed and the success rate is recomputed from the sums.
/// Timings are a simple mean of the per worker values: the aggregate
/// "minimum" is the average of every worker's minimum, not the absolute
/// minimum of any worker, and the aggregate stddev is the average of the
/// per worker stddevs, not a population stddev over all messages.
///
/// Returns `None` for an empty input.
pub fn from_individual_stats(stats: &[StatsRecord]) -> Option<StatsRecord> {
    if stats.is_empty() {
        return None;
    }

    let mins: Vec<f64> = stats.iter().map(|s| s.time_min).collect();
    let maxes: Vec<f64> = stats.iter().map(|s| s.time_max).collect();
    let means: Vec<f64> = stats.iter().map(|s| s.time_mean).collect();
    let stddevs: Vec<f64> = stats.iter().map(|s| s.time_stddev).collect();
    let count_ok = stats.iter().map(|s| s.count_ok).sum();
    let count_total = stats.iter().map(|s| s.count_total).sum();

    let clientid = format!(
        "Aggregate stats (simple average) for {} process(es)",
        stats.len()
    );

    Some(StatsRecord::new(
        clientid,
        count_ok,
        count_total,
        mean(&means)?,
        mean(&stddevs)?,
        mean(&mins)?,
        mean(&maxes)?,
    ))
}
