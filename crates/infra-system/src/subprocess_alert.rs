// Subprocess alert implementation
// reason: tokio for async process management (no blocking the round loop)
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::{debug, info};

use skewer_core::application::constants::{ALERT_ENV_ALLOWLIST, MAXSKEW_ENV};
use skewer_core::port::{AlertAction, AlertError, AlertOutcome, AlertStatus};

// ETXTBSY: the executable is still open for writing somewhere
const EXECUTABLE_BUSY: i32 = 26;
const SPAWN_ATTEMPTS: u32 = 5;
const SPAWN_RETRY_DELAY: Duration = Duration::from_millis(20);

/// Alert action running an external executable
///
/// The child gets a cleared environment: only allowlisted variables from the
/// monitor's own environment plus `MAXSKEW=<seconds>`.
pub struct SubprocessAlert {
    command: PathBuf,
    env_allowlist: Vec<String>,
}

impl SubprocessAlert {
    /// Create a subprocess alert with the default environment allowlist
    ///
    /// # Example
    /// ```ignore
    /// let alert = SubprocessAlert::new("/usr/local/bin/page-oncall");
    /// ```
    pub fn new(command: impl Into<PathBuf>) -> Self {
        Self::with_allowlist(
            command,
            ALERT_ENV_ALLOWLIST.iter().map(|v| v.to_string()).collect(),
        )
    }

    pub fn with_allowlist(command: impl Into<PathBuf>, env_allowlist: Vec<String>) -> Self {
        Self {
            command: command.into(),
            env_allowlist,
        }
    }

    /// Build the child environment from the given parent environment
    fn child_env(
        &self,
        parent: impl Iterator<Item = (String, String)>,
        max_skew: i64,
    ) -> HashMap<String, String> {
        let mut env: HashMap<String, String> = parent
            .filter(|(k, _)| self.env_allowlist.contains(k))
            .collect();
        env.insert(MAXSKEW_ENV.to_string(), max_skew.to_string());
        env
    }

    /// Spawn the command and wait for it (no timeout: a hung alert hangs the monitor)
    ///
    /// A busy executable is retried a few times before giving up; the alert
    /// itself still runs at most once.
    async fn spawn_and_wait(
        &self,
        env: &HashMap<String, String>,
    ) -> Result<std::process::Output, AlertError> {
        let mut attempt = 1;
        let child = loop {
            let spawned = Command::new(&self.command)
                .env_clear()
                .envs(env)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .spawn();

            match spawned {
                Ok(child) => break child,
                Err(e) if e.raw_os_error() == Some(EXECUTABLE_BUSY) && attempt < SPAWN_ATTEMPTS => {
                    debug!(
                        command = %self.command.display(),
                        attempt,
                        "Alert executable busy, retrying spawn"
                    );
                    tokio::time::sleep(SPAWN_RETRY_DELAY * attempt).await;
                    attempt += 1;
                }
                Err(e) => return Err(AlertError::SpawnFailed(e.to_string())),
            }
        };

        child
            .wait_with_output()
            .await
            .map_err(|e| AlertError::IoError(e.to_string()))
    }

    /// Build the alert outcome from process output
    fn build_outcome(&self, output: std::process::Output, duration_ms: i64) -> AlertOutcome {
        let status = if output.status.success() {
            AlertStatus::Delivered
        } else {
            AlertStatus::Failed
        };

        // stdout first, then stderr
        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        AlertOutcome {
            status,
            exit_code: output.status.code(),
            output: combined,
            duration_ms,
        }
    }
}

#[async_trait]
impl AlertAction for SubprocessAlert {
    async fn fire(&self, max_skew: i64) -> Result<AlertOutcome, AlertError> {
        let env = self.child_env(std::env::vars(), max_skew);
        let start = Instant::now();

        info!(
            command = %self.command.display(),
            max_skew = max_skew,
            "Starting alert subprocess"
        );

        let output = self.spawn_and_wait(&env).await?;
        let duration_ms = start.elapsed().as_millis() as i64;
        let outcome = self.build_outcome(output, duration_ms);

        info!(
            command = %self.command.display(),
            duration_ms = duration_ms,
            exit_code = ?outcome.exit_code,
            status = ?outcome.status,
            "Alert subprocess completed"
        );

        Ok(outcome)
    }

    fn describe(&self) -> String {
        self.command.display().to_string()
    }
}
