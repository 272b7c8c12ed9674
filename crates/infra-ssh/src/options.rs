// SSH connection options

use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Host key verification policy handed to `ssh`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KnownHostsPolicy {
    /// Refuse unknown hosts
    Strict,
    /// Accept and remember unknown hosts, refuse changed keys
    #[default]
    Add,
    /// Accept anything (lab fleets only)
    Accept,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown known-hosts policy {0:?} (expected strict, add or accept)")]
pub struct ParsePolicyError(String);

impl FromStr for KnownHostsPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "add" => Ok(Self::Add),
            "accept" => Ok(Self::Accept),
            _ => Err(ParsePolicyError(s.to_string())),
        }
    }
}

impl fmt::Display for KnownHostsPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Strict => "strict",
            Self::Add => "add",
            Self::Accept => "accept",
        })
    }
}

impl From<KnownHostsPolicy> for openssh::KnownHosts {
    fn from(policy: KnownHostsPolicy) -> Self {
        match policy {
            KnownHostsPolicy::Strict => openssh::KnownHosts::Strict,
            KnownHostsPolicy::Add => openssh::KnownHosts::Add,
            KnownHostsPolicy::Accept => openssh::KnownHosts::Accept,
        }
    }
}

/// Options shared by every host connection
#[derive(Debug, Clone)]
pub struct SshOptions {
    pub user: String,
    pub known_hosts: KnownHostsPolicy,
    /// Bound on the initial TCP/auth handshake only; rounds are never timed out
    pub connect_timeout: Option<Duration>,
}

impl SshOptions {
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            known_hosts: KnownHostsPolicy::default(),
            connect_timeout: None,
        }
    }

    pub fn known_hosts(mut self, policy: KnownHostsPolicy) -> Self {
        self.known_hosts = policy;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_from_str() {
        assert_eq!("strict".parse::<KnownHostsPolicy>(), Ok(KnownHostsPolicy::Strict));
        assert_eq!(" ADD ".parse::<KnownHostsPolicy>(), Ok(KnownHostsPolicy::Add));
        assert_eq!("accept".parse::<KnownHostsPolicy>(), Ok(KnownHostsPolicy::Accept));
        assert!("yes".parse::<KnownHostsPolicy>().is_err());
    }

    #[test]
    fn test_policy_display_round_trips() {
        for policy in [
            KnownHostsPolicy::Strict,
            KnownHostsPolicy::Add,
            KnownHostsPolicy::Accept,
        ] {
            assert_eq!(policy.to_string().parse::<KnownHostsPolicy>(), Ok(policy));
        }
    }

    #[test]
    fn test_options_builder() {
        let options = SshOptions::new("ops")
            .known_hosts(KnownHostsPolicy::Strict)
            .connect_timeout(Duration::from_secs(10));

        assert_eq!(options.user, "ops");
        assert_eq!(options.known_hosts, KnownHostsPolicy::Strict);
        assert_eq!(options.connect_timeout, Some(Duration::from_secs(10)));
    }
}
