// Skewer Infrastructure - SSH Adapters
// Implements: HostSession (multiplexed system ssh), agent probe, session pool

pub mod agent;
pub mod options;
pub mod pool;
pub mod session;

pub use agent::{probe_agent, AgentStatus};
pub use options::{KnownHostsPolicy, SshOptions};
pub use pool::{connect_all, connect_pool};
pub use session::OpenSshSession;
