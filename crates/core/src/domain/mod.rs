// Domain Layer - Pure skew logic and entities

pub mod config;
pub mod error;
pub mod host;
pub mod report;
pub mod round;
pub mod skew;

// Re-exports
pub use config::MonitorConfig;
pub use error::DomainError;
pub use host::{Host, HostSet};
pub use report::{ReportRow, SkewReport};
pub use round::{Round, SampleResult};
pub use skew::{evaluate, SkewVerdict};
