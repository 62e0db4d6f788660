use std::fmt;
use std::net::Ipv4Addr;

/// Domain whose zone is requested, kept exactly as the user typed it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Domain(String);

impl Domain {
    /// Wrap a user-supplied domain name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The domain text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Domain {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Authoritative nameserver hostname as returned by the NS lookup
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Nameserver(String);

impl Nameserver {
    /// Wrap a nameserver hostname
    pub fn new(host: impl Into<String>) -> Self {
        Self(host.into())
    }

    /// The hostname text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Nameserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Nameserver {
    fn from(host: &str) -> Self {
        Self::new(host)
    }
}

/// First IPv4 address found for one nameserver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAddress {
    /// Nameserver the address belongs to
    pub nameserver: Nameserver,

    /// The address itself
    pub ip: Ipv4Addr,
}

impl ResolvedAddress {
    /// Bind an address to its nameserver
    #[must_use]
    pub const fn new(nameserver: Nameserver, ip: Ipv4Addr) -> Self {
        Self { nameserver, ip }
    }
}

impl fmt::Display for ResolvedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ip)
    }
}
