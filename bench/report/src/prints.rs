use crate::stats_record::StatsRecord;
use colored::{Color, ColoredString, Colorize};

impl StatsRecord {
    /// Multi-line, human readable form of the record.
    pub fn render(&self) -> String {
        format!(
            "Clientid: {}\n\
             Message success rate: {:.2}% ({}/{} messages)\n\
             Message timing mean   {:.2} ms\n\
             Message timing stddev {:.2} ms\n\
             Message timing min    {:.2} ms\n\
             Message timing max    {:.2} ms",
            self.clientid,
            100.0 * self.rate_ok,
            self.count_ok,
            self.count_total,
            self.time_mean,
            self.time_stddev,
            self.time_min,
            self.time_max
        )
    }

    pub fn formatted_string(&self, color: Color) -> ColoredString {
        self.render().color(color)
    }
}
