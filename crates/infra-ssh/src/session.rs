// OpenSSH-backed HostSession
// One multiplexed master connection per host; each command runs on a fresh
// channel of that master, so per-round sessions are cheap and ephemeral.
use async_trait::async_trait;
use openssh::{Session, SessionBuilder};
use tracing::debug;

use crate::options::SshOptions;
use skewer_core::domain::Host;
use skewer_core::port::{HostSession, SessionError};

/// Persistent connection to one host
pub struct OpenSshSession {
    host: Host,
    session: Session,
}

impl OpenSshSession {
    /// Open the master connection (authenticates through the ssh agent)
    pub async fn connect(host: &Host, options: &SshOptions) -> Result<Self, openssh::Error> {
        let mut builder = SessionBuilder::default();
        builder
            .user(options.user.clone())
            .port(host.ssh_port())
            .known_hosts_check(options.known_hosts.into());
        if let Some(timeout) = options.connect_timeout {
            builder.connect_timeout(timeout);
        }

        debug!(host = %host, user = %options.user, "Opening ssh master connection");
        let session = builder.connect(host.name()).await?;

        Ok(Self {
            host: host.clone(),
            session,
        })
    }
}

#[async_trait]
impl HostSession for OpenSshSession {
    async fn run(&self, command: &str) -> Result<Vec<u8>, SessionError> {
        debug!(host = %self.host, command, "Running remote command");
        let output = self
            .session
            .raw_command(command)
            .output()
            .await
            .map_err(classify_error)?;

        if !output.status.success() {
            return Err(SessionError::NonZeroExit {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output.stdout)
    }
}

/// Lost master connections cannot host a new session; everything else is a
/// failure of the command itself
fn classify_error(err: openssh::Error) -> SessionError {
    match err {
        openssh::Error::Disconnected => SessionError::OpenFailed(err.to_string()),
        other => SessionError::CommandFailed(other.to_string()),
    }
}
