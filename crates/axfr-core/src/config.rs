//! Transfer configuration.

use std::time::Duration;

/// Default wall-clock budget for one zone transfer.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Standard DNS port.
pub const DEFAULT_PORT: u16 = 53;

/// Settings for a single zone transfer attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferConfig {
    /// Budget for the whole transfer: connect, query and every response
    pub timeout: Duration,

    /// TCP port the nameserver is contacted on
    pub port: u16,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TransferConfig {
    /// Create a configuration with the standard port and a 15 second timeout
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            port: DEFAULT_PORT,
        }
    }

    /// Set the transfer timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the nameserver port
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}
