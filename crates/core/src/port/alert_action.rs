// Alert Action Port
// Abstraction for the external action fired on significant skew

use async_trait::async_trait;
use thiserror::Error;

/// Result of running the alert action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertOutcome {
    pub status: AlertStatus,
    /// Exit code, `None` when terminated by a signal
    pub exit_code: Option<i32>,
    /// Combined stdout + stderr
    pub output: String,
    pub duration_ms: i64,
}

impl AlertOutcome {
    pub fn is_success(&self) -> bool {
        self.status == AlertStatus::Delivered
    }
}

/// Alert status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertStatus {
    Delivered,
    Failed,
}

/// Alert invocation errors (the action never produced an outcome)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlertError {
    #[error("Spawn failed: {0}")]
    SpawnFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Alert Action trait
///
/// Implementations:
/// - SubprocessAlert: runs an executable with `MAXSKEW` in its environment
/// - MockAlertAction: records invocations for tests
#[async_trait]
pub trait AlertAction: Send + Sync {
    /// Fire the alert for a measured maximum skew (integer seconds)
    async fn fire(&self, max_skew: i64) -> Result<AlertOutcome, AlertError>;

    /// Human readable description of the action (command path)
    fn describe(&self) -> String;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mock alert behavior
    #[derive(Debug, Clone)]
    pub enum MockAlertBehavior {
        /// Exit zero
        Deliver,
        /// Exit with code and output
        Exit(i32, String),
        /// Cannot even be started
        SpawnFail(String),
    }

    /// Mock AlertAction recording every `max_skew` it is fired with
    pub struct MockAlertAction {
        behavior: MockAlertBehavior,
        fired: Arc<Mutex<Vec<i64>>>,
    }

    impl MockAlertAction {
        pub fn new(behavior: MockAlertBehavior) -> Self {
            Self {
                behavior,
                fired: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn new_delivering() -> Self {
            Self::new(MockAlertBehavior::Deliver)
        }

        pub fn new_failing(code: i32, output: impl Into<String>) -> Self {
            Self::new(MockAlertBehavior::Exit(code, output.into()))
        }

        pub fn fired(&self) -> Vec<i64> {
            self.fired.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AlertAction for MockAlertAction {
        async fn fire(&self, max_skew: i64) -> Result<AlertOutcome, AlertError> {
            self.fired.lock().unwrap().push(max_skew);

            match &self.behavior {
                MockAlertBehavior::Deliver => Ok(AlertOutcome {
                    status: AlertStatus::Delivered,
                    exit_code: Some(0),
                    output: String::new(),
                    duration_ms: 1,
                }),
                MockAlertBehavior::Exit(code, output) => Ok(AlertOutcome {
                    status: AlertStatus::Failed,
                    exit_code: Some(*code),
                    output: output.clone(),
                    duration_ms: 1,
                }),
                MockAlertBehavior::SpawnFail(msg) => Err(AlertError::SpawnFailed(msg.clone())),
            }
        }

        fn describe(&self) -> String {
            "mock-alert".to_string()
        }
    }
}
