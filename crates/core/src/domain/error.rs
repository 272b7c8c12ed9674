// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("No hosts: {0:?}")]
    NoHosts(String),

    #[error("Empty host in list: {0:?}")]
    EmptyHostEntry(String),

    #[error("Invalid host entry: {0:?}")]
    InvalidHost(String),

    #[error("Empty username")]
    EmptyUser,

    #[error("Invalid duration {raw:?}: {reason}")]
    InvalidInterval { raw: String, reason: String },

    #[error("Round has no samples")]
    EmptyRound,

    #[error("Round is missing samples for: {0}")]
    IncompleteRound(String),

    #[error("Round has samples for unknown host: {0}")]
    UnexpectedHost(String),

    #[error("Timestamps {min} and {max} are too far apart to compare")]
    TimestampOutOfRange { min: i64, max: i64 },
}

pub type Result<T> = std::result::Result<T, DomainError>;
