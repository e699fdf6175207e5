use chrono::{DateTime, Utc};
use loadr_report::params::RunParams;
use loadr_report::report::LoadReport;
use loadr_report::stats_record::StatsRecord;

pub struct LoadReportBuilder;

impl LoadReportBuilder {
    pub fn build(
        params: RunParams,
        individual_stats: Vec<StatsRecord>,
        aggregate_stats: StatsRecord,
    ) -> LoadReport {
        let uuid = uuid::Uuid::new_v4();
        let timestamp: DateTime<Utc> = Utc::now();

        LoadReport {
            uuid,
            timestamp: timestamp.to_rfc3339(),
            params,
            individual_stats,
            aggregate_stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::metrics::group::from_individual_stats;
    use loadr_report::qos::Qos;

    #[test]
    fn report_should_keep_submission_order_and_aggregate() {
        let params = RunParams::new(
            "loadr-1".to_owned(),
            "localhost".to_owned(),
            1883,
            Qos::AtMostOnce,
            10,
            100,
            2,
        );
        let individual = vec![
            StatsRecord::new("loadr-1-20", 10, 10, 1.0, 0.1, 0.5, 2.0),
            StatsRecord::new("loadr-1-10", 9, 10, 2.0, 0.2, 1.0, 3.0),
        ];
        let aggregate = from_individual_stats(&individual).unwrap();

        let report = LoadReportBuilder::build(params.clone(), individual.clone(), aggregate.clone());

        assert_eq!(report.params, params);
        assert_eq!(report.individual_stats, individual);
        assert_eq!(report.aggregate_stats, aggregate);
        assert!(DateTime::parse_from_rfc3339(&report.timestamp).is_ok());
    }
}
