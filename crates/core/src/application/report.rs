// Skew reporting through tracing
// Line-oriented log output: header lines, then one table row per host

use crate::domain::{ReportRow, SkewReport};
use crate::port::SkewReporter;
use chrono::{DateTime, SecondsFormat};
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing::info;

/// Table row as rendered in the log
#[derive(Tabled)]
struct RenderedRow {
    host: String,
    time: i64,
    utc: String,
    min: i64,
    max: i64,
}

impl From<&ReportRow> for RenderedRow {
    fn from(row: &ReportRow) -> Self {
        Self {
            host: row.host.to_string(),
            time: row.unix_secs,
            utc: format_utc(row.unix_secs),
            min: row.from_min,
            max: row.from_max,
        }
    }
}

/// RFC 3339 rendering of an epoch timestamp, `-` when out of range
fn format_utc(unix_secs: i64) -> String {
    DateTime::from_timestamp(unix_secs, 0)
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_else(|| "-".to_string())
}

/// Render the per-host table (rows already in sorted host order)
pub fn render_table(report: &SkewReport) -> String {
    let rows: Vec<RenderedRow> = report.rows.iter().map(RenderedRow::from).collect();
    Table::new(rows).with(Style::blank()).to_string()
}

/// Production reporter: writes the report as INFO log lines
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl SkewReporter for TracingReporter {
    fn report(&self, report: &SkewReport) {
        info!(
            expected_noise = report.expected_noise,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "Max expected skew: {}s ({:?})",
            report.expected_noise,
            report.elapsed
        );
        info!(
            actual_skew = report.actual_skew,
            "Actual max skew: {}s",
            report.actual_skew
        );
        for line in render_table(report).lines() {
            info!("{}", line.trim_end());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Host;
    use std::time::Duration;

    fn report() -> SkewReport {
        SkewReport {
            elapsed: Duration::from_secs(1),
            expected_noise: 2,
            actual_skew: 5,
            rows: vec![
                ReportRow {
                    host: Host::parse("alpha").unwrap(),
                    unix_secs: 100,
                    from_min: 0,
                    from_max: 5,
                },
                ReportRow {
                    host: Host::parse("beta:2222").unwrap(),
                    unix_secs: 105,
                    from_min: 5,
                    from_max: 0,
                },
            ],
        }
    }

    #[test]
    fn test_format_utc() {
        assert_eq!(format_utc(0), "1970-01-01T00:00:00Z");
        assert_eq!(format_utc(1_700_000_000), "2023-11-14T22:13:20Z");
        assert_eq!(format_utc(i64::MAX), "-");
    }

    #[test]
    fn test_render_table_keeps_row_order() {
        let table = render_table(&report());
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3, "header + one line per host:\n{table}");
        assert!(lines[0].contains("host") && lines[0].contains("utc"));
        assert!(lines[1].contains("alpha"));
        assert!(lines[2].contains("beta:2222"));
        assert!(lines[2].contains("1970-01-01T00:01:45Z"));
    }

    #[test]
    fn test_tracing_reporter_does_not_panic_without_subscriber() {
        TracingReporter.report(&report());
    }
}
