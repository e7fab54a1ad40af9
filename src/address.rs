//! Agent Address Parsing
//!
//! Turns a configuration string into a connectable host/port pair.
//!
//! ## Grammar
//! ```text
//! address := ["tcp:"] host ":" port
//! host    := any string, split off at the LAST ':'
//! port    := base-10 u16
//! ```
//!
//! `unix:` addresses are rejected outright. Only TCP is supported.

use std::fmt;
use std::io;
use std::net::{SocketAddr, ToSocketAddrs};
use std::str::FromStr;

use crate::error::{AgentError, Result};

const TCP_PREFIX: &str = "tcp:";
const UNIX_PREFIX: &str = "unix:";

/// Host substituted when the address leaves the host empty (`tcp::7777`)
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// A parsed agent address
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    host: String,
    port: u16,
}

impl Address {
    /// Build an address from already-split parts
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Host part as written (may be empty)
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Resolve to socket addresses, substituting [`DEFAULT_HOST`] for an empty host
    pub fn resolve(&self) -> io::Result<Vec<SocketAddr>> {
        let host = if self.host.is_empty() {
            DEFAULT_HOST
        } else {
            self.host.as_str()
        };
        let addrs: Vec<SocketAddr> = (host, self.port).to_socket_addrs()?.collect();
        if addrs.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::AddrNotAvailable,
                "no resolved addresses",
            ));
        }
        Ok(addrs)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

impl FromStr for Address {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self> {
        parse(s)
    }
}

/// Parse a raw address string
///
/// Strips an optional `tcp:` prefix, rejects `unix:` and splits on the last `:`.
pub fn parse(raw: &str) -> Result<Address> {
    let trimmed = raw.trim();
    let rest = trimmed.strip_prefix(TCP_PREFIX).unwrap_or(trimmed);

    if rest.starts_with(UNIX_PREFIX) {
        return Err(AgentError::UnsupportedTransport(format!(
            "unix sockets are not supported: {:?}",
            raw
        )));
    }

    let (host, port) = rest.rsplit_once(':').ok_or_else(|| {
        AgentError::MalformedAddress(format!("expected host:port, got {:?}", raw))
    })?;

    let port = port.parse::<u16>().map_err(|e| {
        AgentError::MalformedAddress(format!("invalid port {:?} in {:?}: {}", port, raw, e))
    })?;

    let host = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);

    Ok(Address::new(host, port))
}
