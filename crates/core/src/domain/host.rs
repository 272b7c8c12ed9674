// Host Domain Model

use super::error::{DomainError, Result};
use std::collections::BTreeSet;
use std::fmt;

/// Default SSH port used when a host entry carries no explicit `:port`
pub const DEFAULT_SSH_PORT: u16 = 22;

/// One fleet member, identified by its network name
///
/// Ordering is by name first, then port, so a `HostSet` iterates in a stable
/// sorted order for reporting.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Host {
    name: String,
    port: Option<u16>,
}

impl Host {
    /// Parse a single host entry (`name` or `name:port`), trimming whitespace
    ///
    /// An explicit default port is dropped, so `web1` and `web1:22` are the
    /// same host.
    pub fn parse(raw: &str) -> Result<Self> {
        let entry = raw.trim();
        if entry.is_empty() {
            return Err(DomainError::InvalidHost(raw.to_string()));
        }

        // Only a single colon is treated as a port separator; anything else
        // (bare IPv6 literals) is kept verbatim as the name.
        let (name, port) = match entry.split_once(':') {
            Some((name, port)) if !port.contains(':') => {
                let port: u16 = port
                    .parse()
                    .map_err(|_| DomainError::InvalidHost(entry.to_string()))?;
                (name.trim(), Some(port))
            }
            _ => (entry, None),
        };

        if name.is_empty() {
            return Err(DomainError::InvalidHost(entry.to_string()));
        }

        Ok(Self {
            name: name.to_string(),
            port: port.filter(|p| *p != DEFAULT_SSH_PORT),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Explicit non-default port, if the entry had one
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Port to dial (explicit or default 22)
    pub fn ssh_port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_SSH_PORT)
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.port {
            Some(port) => write!(f, "{}:{}", self.name, port),
            None => f.write_str(&self.name),
        }
    }
}

/// The fixed fleet: validated, deduplicated, sorted, non-empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSet {
    hosts: BTreeSet<Host>,
}

impl HostSet {
    /// Parse a comma-separated host list
    ///
    /// Every entry must be non-blank after trimming; duplicates collapse.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Err(DomainError::NoHosts(raw.to_string()));
        }

        let hosts = raw
            .split(',')
            .map(|entry| {
                if entry.trim().is_empty() {
                    Err(DomainError::EmptyHostEntry(raw.to_string()))
                } else {
                    Host::parse(entry)
                }
            })
            .collect::<Result<BTreeSet<_>>>()?;

        Ok(Self { hosts })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Host> {
        self.hosts.iter()
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    pub fn contains(&self, host: &Host) -> bool {
        self.hosts.contains(host)
    }
}

impl<'a> IntoIterator for &'a HostSet {
    type Item = &'a Host;
    type IntoIter = std::collections::btree_set::Iter<'a, Host>;

    fn into_iter(self) -> Self::IntoIter {
        self.hosts.iter()
    }
}
