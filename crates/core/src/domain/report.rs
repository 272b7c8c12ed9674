// Skew Report Domain Model
// Per-host view of a significant round, in sorted host order

use super::host::Host;
use super::round::Round;
use super::skew::SkewVerdict;
use std::time::Duration;

/// One host's line in the report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub host: Host,
    pub unix_secs: i64,
    /// Seconds ahead of the slowest clock
    pub from_min: i64,
    /// Seconds behind the fastest clock
    pub from_max: i64,
}

/// Everything logged for a significant round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkewReport {
    pub elapsed: Duration,
    pub expected_noise: i64,
    pub actual_skew: i64,
    pub rows: Vec<ReportRow>,
}

impl SkewReport {
    pub fn new(round: &Round, verdict: &SkewVerdict) -> Self {
        let rows = round
            .times()
            .map(|(host, t)| ReportRow {
                host: host.clone(),
                unix_secs: t,
                from_min: t - verdict.min_time,
                from_max: verdict.max_time - t,
            })
            .collect();

        Self {
            elapsed: round.elapsed(),
            expected_noise: verdict.expected_noise,
            actual_skew: verdict.actual_skew,
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{evaluate, HostSet, SampleResult};

    #[test]
    fn test_rows_follow_sorted_order_not_arrival() {
        let hosts = HostSet::parse("b,a").unwrap();
        // b arrives first
        let samples = vec![
            SampleResult::new(Host::parse("b").unwrap(), 105),
            SampleResult::new(Host::parse("a").unwrap(), 100),
        ];
        let round = Round::assemble(&hosts, samples, Duration::from_secs(1)).unwrap();
        let verdict = evaluate(&round);

        let report = SkewReport::new(&round, &verdict);

        assert_eq!(report.expected_noise, 2);
        assert_eq!(report.actual_skew, 5);
        let rows: Vec<(&str, i64, i64, i64)> = report
            .rows
            .iter()
            .map(|r| (r.host.name(), r.unix_secs, r.from_min, r.from_max))
            .collect();
        assert_eq!(rows, vec![("a", 100, 0, 5), ("b", 105, 5, 0)]);
    }
}
