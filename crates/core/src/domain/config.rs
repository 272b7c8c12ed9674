// Monitor configuration (validated once at startup, immutable afterwards)

use super::error::{DomainError, Result};
use super::host::HostSet;
use std::path::PathBuf;
use std::time::Duration;

/// Validated monitor configuration
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub hosts: HostSet,
    pub user: String,
    pub interval: Duration,
    /// Alert executable; `None` disables alerting
    pub alert: Option<PathBuf>,
}

impl MonitorConfig {
    /// Validate raw start parameters
    ///
    /// # Arguments
    /// * `raw_hosts` - Comma separated host list (`name` or `name:port`)
    /// * `user` - Remote user name (must be non-empty)
    /// * `raw_interval` - Sleep between rounds, e.g. `1m`, `30s`, `1h 30m`
    /// * `alert` - Alert executable path, empty to disable
    pub fn from_raw(raw_hosts: &str, user: &str, raw_interval: &str, alert: &str) -> Result<Self> {
        let hosts = HostSet::parse(raw_hosts)?;

        let user = user.trim();
        if user.is_empty() {
            return Err(DomainError::EmptyUser);
        }

        let interval = parse_interval(raw_interval)?;

        let alert = match alert.trim() {
            "" => None,
            path => Some(PathBuf::from(path)),
        };

        Ok(Self {
            hosts,
            user: user.to_string(),
            interval,
            alert,
        })
    }
}

/// Parse a human duration string (`90s`, `1m`, `2h 15m`, `500ms`)
pub fn parse_interval(raw: &str) -> Result<Duration> {
    humantime::parse_duration(raw.trim()).map_err(|e| DomainError::InvalidInterval {
        raw: raw.to_string(),
        reason: e.to_string(),
    })
}
