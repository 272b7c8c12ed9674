//! Scheduler - the round loop
//!
//! Each round walks an explicit state machine:
//!
//! ```text
//! Sampling -> Evaluating -> Reporting -> Alerting -> Sleeping
//!                      \______________________________/
//!                        (not significant: straight to Sleeping)
//! ```
//!
//! Sleeping is the only state shared by both branches; it waits the fixed
//! interval and starts the next round. Any error ends the loop.

mod shutdown;

pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};

use crate::application::alert::AlertDispatcher;
use crate::application::sampler::Sampler;
use crate::domain::{evaluate, Round, SkewReport, SkewVerdict};
use crate::error::Result;
use crate::port::SkewReporter;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

/// Where a round currently is
#[derive(Debug)]
pub enum RoundState {
    Sampling,
    Evaluating(Round),
    Reporting(Round, SkewVerdict),
    Alerting(SkewVerdict),
    Sleeping(RoundOutcome),
}

/// How a round ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundOutcome {
    /// Spread explained by sampling latency; nothing logged
    Quiet(SkewVerdict),
    /// Significant skew reported (and alerted when an action is configured)
    Reported { verdict: SkewVerdict, alerted: bool },
}

impl RoundOutcome {
    pub fn verdict(&self) -> &SkewVerdict {
        match self {
            RoundOutcome::Quiet(verdict) => verdict,
            RoundOutcome::Reported { verdict, .. } => verdict,
        }
    }
}

/// Drives sample -> evaluate -> report/alert -> sleep forever
pub struct Scheduler {
    sampler: Sampler,
    reporter: Arc<dyn SkewReporter>,
    dispatcher: AlertDispatcher,
    interval: Duration,
}

impl Scheduler {
    pub fn new(
        sampler: Sampler,
        reporter: Arc<dyn SkewReporter>,
        dispatcher: AlertDispatcher,
        interval: Duration,
    ) -> Self {
        Self {
            sampler,
            reporter,
            dispatcher,
            interval,
        }
    }

    /// Run rounds until shutdown is requested or a round fails
    ///
    /// Shutdown is only observed between rounds: a round in flight always
    /// runs to completion.
    pub async fn run(&self, mut shutdown: ShutdownToken) -> Result<()> {
        info!(
            hosts = self.sampler.hosts().len(),
            interval = ?self.interval,
            alerting = self.dispatcher.is_enabled(),
            "Skew monitor started"
        );

        let mut rounds: u64 = 0;
        loop {
            if shutdown.is_shutdown() {
                break;
            }

            let outcome = self.run_round().await?;
            rounds += 1;
            debug!(round = rounds, outcome = ?outcome, "Round finished");

            tokio::select! {
                _ = sleep(self.interval) => {},
                _ = shutdown.wait() => {
                    info!("Skew monitor interrupted during sleep");
                    break;
                }
            }
        }

        info!(rounds, "Skew monitor stopped");
        Ok(())
    }

    /// Run a single round up to (not including) the sleep
    pub async fn run_round(&self) -> Result<RoundOutcome> {
        let mut state = RoundState::Sampling;
        loop {
            state = match state {
                RoundState::Sampling => RoundState::Evaluating(self.sampler.sample().await?),
                RoundState::Evaluating(round) => {
                    let verdict = evaluate(&round);
                    if verdict.significant {
                        RoundState::Reporting(round, verdict)
                    } else {
                        debug!(
                            actual_skew = verdict.actual_skew,
                            expected_noise = verdict.expected_noise,
                            "Skew within sampling noise"
                        );
                        RoundState::Sleeping(RoundOutcome::Quiet(verdict))
                    }
                }
                RoundState::Reporting(round, verdict) => {
                    self.reporter.report(&SkewReport::new(&round, &verdict));
                    RoundState::Alerting(verdict)
                }
                RoundState::Alerting(verdict) => {
                    let alerted = self.dispatcher.dispatch(&verdict).await?;
                    RoundState::Sleeping(RoundOutcome::Reported { verdict, alerted })
                }
                RoundState::Sleeping(outcome) => return Ok(outcome),
            };
        }
    }
}
