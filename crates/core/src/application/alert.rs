// Alert dispatch
// An alert that cannot be delivered must stop the monitor, never be dropped

use crate::domain::SkewVerdict;
use crate::error::{AppError, Result};
use crate::port::AlertAction;
use std::sync::Arc;
use tracing::{info, warn};

/// Fires the configured alert action for significant verdicts
#[derive(Clone, Default)]
pub struct AlertDispatcher {
    action: Option<Arc<dyn AlertAction>>,
}

impl AlertDispatcher {
    /// Create a dispatcher; `None` disables alerting
    pub fn new(action: Option<Arc<dyn AlertAction>>) -> Self {
        Self { action }
    }

    pub fn disabled() -> Self {
        Self { action: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.action.is_some()
    }

    /// Fire the alert with `MAXSKEW = verdict.actual_skew`
    ///
    /// Returns whether an alert was delivered (`false` when disabled or the
    /// verdict is not significant).
    ///
    /// # Errors
    /// - AppError::AlertInvocation if the action cannot be started
    /// - AppError::AlertFailed if it exits abnormally; carries its output
    pub async fn dispatch(&self, verdict: &SkewVerdict) -> Result<bool> {
        let action = match &self.action {
            Some(action) if verdict.significant => action,
            _ => return Ok(false),
        };

        let command = action.describe();
        info!(command = %command, max_skew = verdict.actual_skew, "Running alert command");

        let outcome = action
            .fire(verdict.actual_skew)
            .await
            .map_err(|source| AppError::AlertInvocation {
                command: command.clone(),
                source,
            })?;

        if !outcome.is_success() {
            warn!(
                command = %command,
                exit_code = ?outcome.exit_code,
                "Alert command failed"
            );
            return Err(AppError::AlertFailed {
                command,
                exit_code: outcome.exit_code,
                output: outcome.output,
            });
        }

        info!(
            command = %command,
            duration_ms = outcome.duration_ms,
            "Alert delivered"
        );
        Ok(true)
    }
}
