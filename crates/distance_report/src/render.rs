use chrono::NaiveDate;
use itertools::Itertools;

use crate::aggregate::AggregateReport;

pub const REPORT_HEADER: &str =
    "Total distance traveled in each country per day (in kilometers):";

/// `distance_report_<YYYY-MM-DD>.txt`
pub fn report_file_name(today: NaiveDate) -> String {
    format!("distance_report_{}.txt", today.format("%Y-%m-%d"))
}

/// Countries sorted by code, days sorted chronologically.
pub fn render_lines(report: &AggregateReport) -> Vec<String> {
    let mut lines = vec![REPORT_HEADER.to_owned()];
    for (country, days) in report.countries().iter().sorted_by(|a, b| a.0.cmp(b.0)) {
        lines.push(format!("Country: {}", country));
        for (date, km) in days.iter().sorted_by_key(|(date, _)| **date) {
            lines.push(format!("  {}: {:.2} km", date.format("%Y-%m-%d"), km));
        }
    }
    lines
}

/// The whole report, one newline-terminated line per entry.
pub fn render(report: &AggregateReport) -> String {
    render_lines(report)
        .into_iter()
        .map(|line| line + "\n")
        .collect()
}
