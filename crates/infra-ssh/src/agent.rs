// ssh-agent probe
// The system ssh client authenticates through $SSH_AUTH_SOCK; an unreachable
// agent is a startup error, checked before any host is dialed.

use skewer_core::error::{AppError, Result};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;
use tracing::{info, warn};

/// Environment variable naming the agent socket
pub const AUTH_SOCK_ENV: &str = "SSH_AUTH_SOCK";

// Agent protocol message numbers (draft-miller-ssh-agent)
const SSH_AGENTC_REQUEST_IDENTITIES: u8 = 11;
const SSH_AGENT_IDENTITIES_ANSWER: u8 = 12;

/// Reachable agent and the number of identities it offers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentStatus {
    pub socket: PathBuf,
    pub identities: u32,
}

/// Probe the agent named by `$SSH_AUTH_SOCK`
pub async fn probe_agent() -> Result<AgentStatus> {
    let socket = std::env::var(AUTH_SOCK_ENV).unwrap_or_default();
    probe_agent_at(&socket).await
}

/// Connect to the agent socket and ask it for its identities
///
/// # Errors
/// - AppError::Agent if the socket is unset, unreachable or does not speak
///   the agent protocol
pub async fn probe_agent_at(socket: &str) -> Result<AgentStatus> {
    let agent_err = |reason: String| AppError::Agent {
        socket: socket.to_string(),
        reason,
    };

    if socket.trim().is_empty() {
        return Err(agent_err("variable not set".to_string()));
    }

    let mut stream = UnixStream::connect(Path::new(socket))
        .await
        .map_err(|e| agent_err(e.to_string()))?;

    let identities = request_identity_count(&mut stream)
        .await
        .map_err(|e| agent_err(e.to_string()))?;

    if identities == 0 {
        warn!(socket = %socket, "ssh agent holds no identities");
    } else {
        info!(socket = %socket, identities, "ssh agent reachable");
    }

    Ok(AgentStatus {
        socket: PathBuf::from(socket),
        identities,
    })
}

/// Send REQUEST_IDENTITIES and read the key count from the answer
async fn request_identity_count(stream: &mut UnixStream) -> std::io::Result<u32> {
    // uint32 length (1) + byte message type
    let mut request = Vec::with_capacity(5);
    request.extend_from_slice(&1u32.to_be_bytes());
    request.push(SSH_AGENTC_REQUEST_IDENTITIES);
    stream.write_all(&request).await?;

    let len = stream.read_u32().await?;
    if len < 5 {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("short agent reply ({} bytes)", len),
        ));
    }
    let kind = stream.read_u8().await?;
    if kind != SSH_AGENT_IDENTITIES_ANSWER {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("unexpected agent reply type {}", kind),
        ));
    }
    stream.read_u32().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::UnixListener;

    fn socket_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("skewer-agent-{}-{}.sock", tag, std::process::id()))
    }

    /// Minimal agent answering one REQUEST_IDENTITIES with `count` keys
    async fn fake_agent(path: &Path, reply_type: u8, count: u32) -> tokio::task::JoinHandle<()> {
        let _ = std::fs::remove_file(path);
        let listener = UnixListener::bind(path).unwrap();
        tokio::spawn(async move {
            let (mut conn, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 5];
            conn.read_exact(&mut request).await.unwrap();
            assert_eq!(request[4], SSH_AGENTC_REQUEST_IDENTITIES);

            let mut reply = Vec::new();
            reply.extend_from_slice(&5u32.to_be_bytes());
            reply.push(reply_type);
            reply.extend_from_slice(&count.to_be_bytes());
            conn.write_all(&reply).await.unwrap();
        })
    }

    #[tokio::test]
    async fn test_probe_unset_socket() {
        let err = probe_agent_at("").await.unwrap_err();
        assert!(matches!(err, AppError::Agent { .. }));
    }

    #[tokio::test]
    async fn test_probe_missing_socket() {
        let err = probe_agent_at("/nonexistent/skewer-agent.sock")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Agent { ref socket, .. } if socket == "/nonexistent/skewer-agent.sock"));
    }

    #[tokio::test]
    async fn test_probe_counts_identities() {
        let path = socket_path("ok");
        let agent = fake_agent(&path, SSH_AGENT_IDENTITIES_ANSWER, 2).await;

        let status = probe_agent_at(path.to_str().unwrap()).await.unwrap();

        assert_eq!(status.identities, 2);
        assert_eq!(status.socket, path);
        agent.await.unwrap();
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_probe_rejects_wrong_reply() {
        let path = socket_path("bad");
        // SSH_AGENT_FAILURE
        let agent = fake_agent(&path, 5, 0).await;

        let err = probe_agent_at(path.to_str().unwrap()).await.unwrap_err();

        assert!(matches!(err, AppError::Agent { .. }));
        agent.await.unwrap();
        let _ = std::fs::remove_file(&path);
    }
}
