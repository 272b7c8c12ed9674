// Central Error Type for the Application
// Every failure is fatal: errors bubble up to main, which logs once and exits

use crate::domain::Host;
use crate::port::{AlertError, SessionError};
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unable to connect to ssh agent on $SSH_AUTH_SOCK ({socket:?}): {reason}")]
    Agent { socket: String, reason: String },

    #[error("Error connecting to \"{host}\": {reason}")]
    Connect { host: Host, reason: String },

    #[error("Error running date on host \"{host}\": {source}")]
    Session {
        host: Host,
        #[source]
        source: SessionError,
    },

    #[error("Unable to parse time {raw:?} from host \"{host}\": {reason}")]
    MalformedTime {
        host: Host,
        raw: String,
        reason: String,
    },

    #[error("Alert command {command:?} could not be run: {source}")]
    AlertInvocation {
        command: String,
        #[source]
        source: AlertError,
    },

    #[error("Alert command failed!\nCommand: {command:?}\nExit code: {exit_code:?}\nOutput:\n{output}")]
    AlertFailed {
        command: String,
        exit_code: Option<i32>,
        output: String,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_failure_message_carries_output() {
        let err = AppError::AlertFailed {
            command: "/bin/page".to_string(),
            exit_code: Some(3),
            output: "pager offline\n".to_string(),
        };

        let message = err.to_string();
        assert!(message.contains("\"/bin/page\""));
        assert!(message.contains("Some(3)"));
        assert!(message.ends_with("pager offline\n"));
    }

    #[test]
    fn test_malformed_time_names_host_and_raw_output() {
        let err = AppError::MalformedTime {
            host: Host::parse("db1").unwrap(),
            raw: "not-a-number".to_string(),
            reason: "invalid digit found in string".to_string(),
        };

        let message = err.to_string();
        assert!(message.contains("db1"));
        assert!(message.contains("\"not-a-number\""));
    }
}
