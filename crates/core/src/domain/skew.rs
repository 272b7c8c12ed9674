//! Skew evaluation
//!
//! A round's spread is only worth reporting when it cannot be explained by the
//! time it took to collect the samples: hosts are asked one after another on
//! the wire, so a fan-out that took `elapsed` seconds can show up to roughly
//! that much apparent disagreement on perfectly synchronised clocks.
//!
//! ```text
//! expected_noise = floor(elapsed_secs) + 1
//! significant    = (max_time - min_time) >= expected_noise
//! ```

use super::host::Host;
use super::round::Round;

/// Outcome of evaluating one round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkewVerdict {
    pub min_time: i64,
    pub min_host: Host,
    pub max_time: i64,
    pub max_host: Host,
    /// `max_time - min_time`, in seconds
    pub actual_skew: i64,
    /// Spread attributable to sampling latency, in seconds
    pub expected_noise: i64,
    pub significant: bool,
}

/// Noise allowance for a fan-out that took `elapsed`
pub fn expected_noise(elapsed: std::time::Duration) -> i64 {
    // Saturate rather than wrap on absurd durations
    i64::try_from(elapsed.as_secs())
        .unwrap_or(i64::MAX - 1)
        .saturating_add(1)
}

/// Evaluate a round (pure: same round, same verdict)
///
/// Ties for the extremes resolve to the first host in sorted order.
pub fn evaluate(round: &Round) -> SkewVerdict {
    let mut times = round.times();
    // Round guarantees at least one sample
    let (first_host, first_time) = match times.next() {
        Some(first) => first,
        None => unreachable!("Round is never empty"),
    };

    let (mut min_host, mut min_time) = (first_host, first_time);
    let (mut max_host, mut max_time) = (first_host, first_time);
    for (host, time) in times {
        if time < min_time {
            min_host = host;
            min_time = time;
        }
        if time > max_time {
            max_host = host;
            max_time = time;
        }
    }

    // Round bounds the spread to i64
    let actual_skew = max_time - min_time;
    let expected_noise = expected_noise(round.elapsed());

    SkewVerdict {
        min_time,
        min_host: min_host.clone(),
        max_time,
        max_host: max_host.clone(),
        actual_skew,
        expected_noise,
        significant: actual_skew >= expected_noise,
    }
}
