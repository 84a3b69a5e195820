//! Replica addressing.
//!
//! Replica lists are written one entry per replica as
//! `host:port;client_port[, key material...]`. `port` is the replica-to-replica
//! port, `client_port` is where the replica (or the relay standing in for it)
//! accepts client requests.

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use crate::errors::ConfigError;

/// One parsed replica entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplicaSpec {
    pub host: IpAddr,
    pub peer_port: u16,
    pub client_port: Option<u16>,
}

impl ReplicaSpec {
    /// Replica-to-replica address.
    #[must_use]
    pub fn peer_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.peer_port)
    }

    /// Client-facing address, if the entry names a client port.
    #[must_use]
    pub fn client_addr(&self) -> Option<SocketAddr> {
        self.client_port.map(|port| SocketAddr::new(self.host, port))
    }

    /// Parse a whole list, rejecting an empty one.
    pub fn parse_list<S: AsRef<str>>(entries: &[S]) -> Result<Vec<Self>, ConfigError> {
        if entries.is_empty() {
            return Err(ConfigError::EmptyReplicaList);
        }
        entries.iter().map(|e| e.as_ref().parse()).collect()
    }

    /// Select the entry at `idx`, validating the range.
    pub fn select(list: &[Self], idx: i64) -> Result<Self, ConfigError> {
        if list.is_empty() {
            return Err(ConfigError::EmptyReplicaList);
        }
        usize::try_from(idx)
            .ok()
            .and_then(|i| list.get(i).copied())
            .ok_or(ConfigError::IndexOutOfRange {
                idx,
                len: list.len(),
            })
    }
}

fn invalid(entry: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidReplicaSpec {
        entry: entry.to_string(),
        reason: reason.into(),
    }
}

fn parse_port(entry: &str, raw: &str, what: &str) -> Result<u16, ConfigError> {
    raw.trim()
        .parse::<u16>()
        .map_err(|e| invalid(entry, format!("bad {what} '{}': {e}", raw.trim())))
}

impl FromStr for ReplicaSpec {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Trailing comma-separated fields carry key material we don't use.
        let addr_part = s.split(',').next().unwrap_or_default().trim();
        if addr_part.is_empty() {
            return Err(invalid(s, "empty entry"));
        }

        let mut halves = addr_part.split(';');
        let host_port = halves.next().unwrap_or_default().trim();
        let client_port = match halves.next() {
            Some(raw) => Some(parse_port(s, raw, "client port")?),
            None => None,
        };
        if halves.next().is_some() {
            return Err(invalid(s, "more than one ';' separator"));
        }

        let (host, port) = host_port
            .rsplit_once(':')
            .ok_or_else(|| invalid(s, "missing ':port'"))?;
        let host = host
            .trim()
            .trim_start_matches('[')
            .trim_end_matches(']')
            .parse::<IpAddr>()
            .map_err(|e| invalid(s, format!("bad host '{}': {e}", host.trim())))?;

        Ok(Self {
            host,
            peer_port: parse_port(s, port, "port")?,
            client_port,
        })
    }
}
