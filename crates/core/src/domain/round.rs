// Round Domain Model
// One polling cycle: every host's observed time plus the fan-out duration

use super::error::{DomainError, Result};
use super::host::{Host, HostSet};
use std::collections::BTreeMap;
use std::time::Duration;

/// Observed Unix timestamp for one host (seconds since epoch)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleResult {
    pub host: Host,
    pub unix_secs: i64,
}

impl SampleResult {
    pub fn new(host: Host, unix_secs: i64) -> Self {
        Self { host, unix_secs }
    }
}

/// Complete set of samples for one round
///
/// Holds exactly one timestamp per configured host; construction fails
/// otherwise, so a partial round can never reach evaluation. The spread
/// between the earliest and latest timestamp always fits in an `i64`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    times: BTreeMap<Host, i64>,
    elapsed: Duration,
}

impl Round {
    /// Assemble a round from samples in arrival order
    pub fn assemble(
        hosts: &HostSet,
        samples: impl IntoIterator<Item = SampleResult>,
        elapsed: Duration,
    ) -> Result<Self> {
        let mut times = BTreeMap::new();
        for sample in samples {
            if !hosts.contains(&sample.host) {
                return Err(DomainError::UnexpectedHost(sample.host.to_string()));
            }
            times.insert(sample.host, sample.unix_secs);
        }

        let missing: Vec<String> = hosts
            .iter()
            .filter(|h| !times.contains_key(*h))
            .map(Host::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(DomainError::IncompleteRound(missing.join(", ")));
        }
        if times.is_empty() {
            return Err(DomainError::EmptyRound);
        }
        check_spread(&times)?;

        Ok(Self { times, elapsed })
    }

    /// Build a round straight from a host -> time mapping (tests, replays)
    pub fn from_times(times: BTreeMap<Host, i64>, elapsed: Duration) -> Result<Self> {
        if times.is_empty() {
            return Err(DomainError::EmptyRound);
        }
        check_spread(&times)?;
        Ok(Self { times, elapsed })
    }

    /// Samples in sorted host order
    pub fn times(&self) -> impl Iterator<Item = (&Host, i64)> {
        self.times.iter().map(|(h, t)| (h, *t))
    }

    pub fn time_of(&self, host: &Host) -> Option<i64> {
        self.times.get(host).copied()
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

/// Reject rounds whose `max - min` would overflow
fn check_spread(times: &BTreeMap<Host, i64>) -> Result<()> {
    let min = times.values().copied().min().unwrap_or_default();
    let max = times.values().copied().max().unwrap_or_default();
    match max.checked_sub(min) {
        Some(_) => Ok(()),
        None => Err(DomainError::TimestampOutOfRange { min, max }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host(name: &str) -> Host {
        Host::parse(name).unwrap()
    }

    #[test]
    fn test_assemble_orders_by_host() {
        let hosts = HostSet::parse("b,a,c").unwrap();
        let samples = vec![
            SampleResult::new(host("c"), 3),
            SampleResult::new(host("a"), 1),
            SampleResult::new(host("b"), 2),
        ];

        let round = Round::assemble(&hosts, samples, Duration::from_millis(250)).unwrap();

        let order: Vec<(&str, i64)> = round.times().map(|(h, t)| (h.name(), t)).collect();
        assert_eq!(order, vec![("a", 1), ("b", 2), ("c", 3)]);
        assert_eq!(round.elapsed(), Duration::from_millis(250));
    }

    #[test]
    fn test_assemble_rejects_missing_host() {
        let hosts = HostSet::parse("a,b,c").unwrap();
        let samples = vec![SampleResult::new(host("a"), 1)];

        let err = Round::assemble(&hosts, samples, Duration::ZERO).unwrap_err();
        assert_eq!(err, DomainError::IncompleteRound("b, c".to_string()));
    }

    #[test]
    fn test_assemble_rejects_unknown_host() {
        let hosts = HostSet::parse("a").unwrap();
        let samples = vec![
            SampleResult::new(host("a"), 1),
            SampleResult::new(host("z"), 1),
        ];

        let err = Round::assemble(&hosts, samples, Duration::ZERO).unwrap_err();
        assert_eq!(err, DomainError::UnexpectedHost("z".to_string()));
    }

    #[test]
    fn test_rejects_spread_beyond_i64() {
        let times: BTreeMap<Host, i64> = [(host("a"), -1), (host("b"), i64::MAX)]
            .into_iter()
            .collect();
        assert_eq!(
            Round::from_times(times, Duration::ZERO),
            Err(DomainError::TimestampOutOfRange {
                min: -1,
                max: i64::MAX
            })
        );

        let hosts = HostSet::parse("a,b").unwrap();
        let samples = vec![
            SampleResult::new(host("a"), i64::MIN),
            SampleResult::new(host("b"), 1),
        ];
        assert!(matches!(
            Round::assemble(&hosts, samples, Duration::ZERO),
            Err(DomainError::TimestampOutOfRange { .. })
        ));
    }

    #[test]
    fn test_widest_representable_spread_is_accepted() {
        let times: BTreeMap<Host, i64> = [(host("a"), 0), (host("b"), i64::MAX)]
            .into_iter()
            .collect();
        assert!(Round::from_times(times, Duration::ZERO).is_ok());
    }

    #[test]
    fn test_from_times_rejects_empty() {
        assert_eq!(
            Round::from_times(BTreeMap::new(), Duration::ZERO),
            Err(DomainError::EmptyRound)
        );
    }
}
