// Host Session Port
// Abstraction over an authenticated remote-execution channel to one host

use crate::domain::Host;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

/// Remote-execution errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Session open failed: {0}")]
    OpenFailed(String),

    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("Command exited with status {code:?}: {stderr}")]
    NonZeroExit { code: Option<i32>, stderr: String },
}

/// Persistent channel to a single host
///
/// Implementations:
/// - OpenSshSession: multiplexed system `ssh` connection (infra-ssh)
/// - MockHostSession: scripted output for tests
#[async_trait]
pub trait HostSession: Send + Sync {
    /// Run one command on the host and return its stdout
    ///
    /// Each call uses a fresh ephemeral session on the existing connection.
    ///
    /// # Errors
    /// - SessionError::OpenFailed if no session can be opened
    /// - SessionError::CommandFailed if the command cannot be run
    /// - SessionError::NonZeroExit if the command reports failure
    async fn run(&self, command: &str) -> Result<Vec<u8>, SessionError>;
}

/// Open sessions keyed by host
///
/// Built once at startup and read-only afterwards; each sampling task gets a
/// shared handle to exactly one session.
#[derive(Clone, Default)]
pub struct SessionPool {
    sessions: BTreeMap<Host, Arc<dyn HostSession>>,
}

impl SessionPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, host: Host, session: Arc<dyn HostSession>) {
        self.sessions.insert(host, session);
    }

    pub fn get(&self, host: &Host) -> Option<&Arc<dyn HostSession>> {
        self.sessions.get(host)
    }

    /// Sessions in sorted host order
    pub fn iter(&self) -> impl Iterator<Item = (&Host, &Arc<dyn HostSession>)> {
        self.sessions.iter()
    }

    pub fn hosts(&self) -> impl Iterator<Item = &Host> {
        self.sessions.keys()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl FromIterator<(Host, Arc<dyn HostSession>)> for SessionPool {
    fn from_iter<I: IntoIterator<Item = (Host, Arc<dyn HostSession>)>>(iter: I) -> Self {
        Self {
            sessions: iter.into_iter().collect(),
        }
    }
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Mock session behavior
    #[derive(Debug, Clone)]
    pub enum MockReply {
        /// Reply with raw stdout
        Output(Vec<u8>),
        /// Fail with the given error
        Fail(SessionError),
    }

    /// Mock HostSession returning scripted replies
    ///
    /// Replies are consumed in order; the last one repeats once the script
    /// runs out.
    pub struct MockHostSession {
        replies: Arc<Mutex<Vec<MockReply>>>,
        delay: Duration,
        commands: Arc<Mutex<Vec<String>>>,
    }

    impl MockHostSession {
        pub fn new(replies: Vec<MockReply>) -> Self {
            Self {
                replies: Arc::new(Mutex::new(replies)),
                delay: Duration::ZERO,
                commands: Arc::new(Mutex::new(Vec::new())),
            }
        }

        /// Always answer with the given epoch seconds (newline terminated)
        pub fn with_time(unix_secs: i64) -> Self {
            Self::with_output(format!("{}\n", unix_secs))
        }

        pub fn with_output(output: impl Into<String>) -> Self {
            Self::new(vec![MockReply::Output(output.into().into_bytes())])
        }

        pub fn failing(error: SessionError) -> Self {
            Self::new(vec![MockReply::Fail(error)])
        }

        /// Answer each call with the next time in the list
        pub fn with_times(times: &[i64]) -> Self {
            Self::new(
                times
                    .iter()
                    .map(|t| MockReply::Output(format!("{}\n", t).into_bytes()))
                    .collect(),
            )
        }

        /// Sleep (tokio time) before answering
        pub fn delayed(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        /// Commands received so far
        pub fn commands(&self) -> Vec<String> {
            self.commands.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.commands.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl HostSession for MockHostSession {
        async fn run(&self, command: &str) -> Result<Vec<u8>, SessionError> {
            self.commands.lock().unwrap().push(command.to_string());

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            let reply = {
                let mut replies = self.replies.lock().unwrap();
                if replies.len() > 1 {
                    replies.remove(0)
                } else {
                    replies
                        .first()
                        .cloned()
                        .unwrap_or(MockReply::Fail(SessionError::OpenFailed(
                            "no scripted reply".to_string(),
                        )))
                }
            };

            match reply {
                MockReply::Output(bytes) => Ok(bytes),
                MockReply::Fail(e) => Err(e),
            }
        }
    }
}
