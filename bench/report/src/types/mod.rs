pub mod params;
pub mod qos;
pub mod report;
pub mod stats_record;
