//! Sampler - one concurrent time query per host
//!
//! Every host gets its own task, all spawned before any is awaited. The round
//! is only assembled after the whole fan-out joined, and the fan-out duration
//! becomes the round's elapsed time.

use crate::application::constants::REMOTE_TIME_COMMAND;
use crate::domain::{Host, HostSet, Round, SampleResult};
use crate::error::{AppError, Result};
use crate::port::{HostSession, SessionError, SessionPool};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::debug;

/// Samples the whole fleet once per call
pub struct Sampler {
    hosts: HostSet,
    pool: SessionPool,
}

impl Sampler {
    /// Create a sampler over an already connected pool
    ///
    /// # Errors
    /// - AppError::Config if the pool does not hold exactly one session per host
    pub fn new(hosts: HostSet, pool: SessionPool) -> Result<Self> {
        let missing: Vec<String> = hosts
            .iter()
            .filter(|h| pool.get(h).is_none())
            .map(Host::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(AppError::Config(format!(
                "No session for host(s): {}",
                missing.join(", ")
            )));
        }
        if let Some(extra) = pool.hosts().find(|h| !hosts.contains(h)) {
            return Err(AppError::Config(format!(
                "Session for unconfigured host: {}",
                extra
            )));
        }

        Ok(Self { hosts, pool })
    }

    pub fn hosts(&self) -> &HostSet {
        &self.hosts
    }

    /// Query every host concurrently and assemble a round
    ///
    /// # Errors
    /// Any single host failing is fatal for the round. When several fail, the
    /// first host in sorted order is reported.
    pub async fn sample(&self) -> Result<Round> {
        let start = Instant::now();

        let mut tasks = JoinSet::new();
        for (host, session) in self.pool.iter() {
            let host = host.clone();
            let session = Arc::clone(session);
            tasks.spawn(async move {
                let output = query_host(session.as_ref()).await;
                (host, output)
            });
        }

        let mut outputs: BTreeMap<Host, std::result::Result<Vec<u8>, SessionError>> =
            BTreeMap::new();
        let mut panicked = None;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((host, output)) => {
                    outputs.insert(host, output);
                }
                Err(e) => {
                    panicked.get_or_insert_with(|| e.to_string());
                }
            }
        }
        let elapsed = start.elapsed();

        debug!(
            hosts = self.hosts.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Sampling fan-out completed"
        );

        let mut samples = Vec::with_capacity(outputs.len());
        for (host, output) in outputs {
            let raw = output.map_err(|source| AppError::Session {
                host: host.clone(),
                source,
            })?;
            let unix_secs = parse_timestamp(&host, &raw)?;
            debug!(host = %host, unix_secs, "Host time sampled");
            samples.push(SampleResult::new(host, unix_secs));
        }

        if let Some(reason) = panicked {
            return Err(AppError::Internal(format!("Sampling task failed: {}", reason)));
        }

        Ok(Round::assemble(&self.hosts, samples, elapsed)?)
    }
}

async fn query_host(session: &dyn HostSession) -> std::result::Result<Vec<u8>, SessionError> {
    session.run(REMOTE_TIME_COMMAND).await
}

/// Parse `date +%s` output: decimal seconds, surrounding whitespace ignored
pub fn parse_timestamp(host: &Host, raw: &[u8]) -> Result<i64> {
    let text = String::from_utf8_lossy(raw);
    text.trim()
        .parse::<i64>()
        .map_err(|e| AppError::MalformedTime {
            host: host.clone(),
            raw: text.to_string(),
            reason: e.to_string(),
        })
}
