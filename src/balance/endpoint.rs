//! Backend endpoint value type.

use std::fmt;
use std::net::{AddrParseError, SocketAddr};
use std::str::FromStr;

/// A single backend address that can accept forwarded requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Endpoint {
    /// The address of the backend.
    pub addr: SocketAddr,
}

impl Endpoint {
    /// Create a new endpoint.
    pub fn new(addr: SocketAddr) -> Self {
        Self { addr }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.addr.fmt(f)
    }
}

impl FromStr for Endpoint {
    type Err = AddrParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Endpoint::new)
    }
}

/// The ordered list of endpoints for one alias, as of one resolution.
///
/// Owned transiently by the dispatcher for the duration of a single
/// request attempt; never cached across resolutions.
pub type BackendSet = Vec<Endpoint>;
