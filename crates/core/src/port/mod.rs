// Port Layer - Interfaces for external collaborators

pub mod alert_action;
pub mod host_session;
pub mod reporter;

// Re-exports
pub use alert_action::{AlertAction, AlertError, AlertOutcome, AlertStatus};
pub use host_session::{HostSession, SessionError, SessionPool};
pub use reporter::SkewReporter;
