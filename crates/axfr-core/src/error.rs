use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::types::{Domain, Nameserver};

/// Result type alias for probe operations
pub type Result<T> = std::result::Result<T, AxfrError>;

/// Errors that can occur while probing a domain's nameservers
#[derive(Error, Debug)]
pub enum AxfrError {
    /// The NS lookup for the target domain failed
    #[error("Error retrieving nameservers for {domain}: {reason}")]
    NameserverLookup {
        /// Domain whose NS records were requested
        domain: Domain,
        /// Underlying resolver error
        reason: String,
    },

    /// The A lookup for a nameserver failed
    #[error("Error resolving nameserver {nameserver} to IP: {reason}")]
    AddressResolution {
        /// Nameserver that could not be resolved
        nameserver: Nameserver,
        /// Underlying resolver error
        reason: String,
    },

    /// The A lookup succeeded but carried no address
    #[error("Error resolving nameserver {nameserver} to IP: no address resolved")]
    NoAddress {
        /// Nameserver without an IPv4 address
        nameserver: Nameserver,
    },

    /// The zone transfer itself failed
    #[error("Error performing AXFR from {nameserver} ({address}) for {domain}: {cause}")]
    Transfer {
        /// Nameserver the transfer was attempted against
        nameserver: Nameserver,
        /// Address the session was opened to
        address: Ipv4Addr,
        /// Zone that was requested
        domain: Domain,
        /// What went wrong
        cause: TransferFailure,
    },

    /// The system resolver could not be configured
    #[error("failed to create resolver: {reason}")]
    ResolverSetup {
        /// Configuration error
        reason: String,
    },

    /// The domain is not a valid DNS name
    #[error("invalid domain name {domain}: {reason}")]
    InvalidDomain {
        /// Offending input
        domain: Domain,
        /// Parser error
        reason: String,
    },

    /// Writing the result file failed
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        /// Target path
        path: PathBuf,
        /// I/O error from the filesystem
        #[source]
        source: std::io::Error,
    },
}

impl AxfrError {
    /// Returns true for failures tied to a single nameserver.
    ///
    /// These are reported and the run moves on to the next nameserver;
    /// any other error ends the run.
    #[must_use]
    pub const fn is_per_nameserver(&self) -> bool {
        matches!(
            self,
            Self::AddressResolution { .. } | Self::NoAddress { .. } | Self::Transfer { .. }
        )
    }

    /// Returns the transfer cause, if this is a transfer failure
    #[must_use]
    pub const fn transfer_cause(&self) -> Option<&TransferFailure> {
        match self {
            Self::Transfer { cause, .. } => Some(cause),
            _ => None,
        }
    }
}

/// Why a zone transfer session failed
#[derive(Error, Debug)]
pub enum TransferFailure {
    /// TCP connection could not be established
    #[error("connection failed: {0}")]
    Connect(std::io::Error),

    /// The whole transfer did not finish in time
    #[error("transfer timed out after {} seconds", .0.as_secs_f64())]
    Timeout(Duration),

    /// The server answered with a non-success response code
    #[error("transfer refused by server ({0})")]
    Refused(String),

    /// The transferred data does not form a zone
    #[error("malformed zone data: {0}")]
    Malformed(String),

    /// Reading or writing the session failed mid-transfer
    #[error("network error: {0}")]
    Io(#[from] std::io::Error),

    /// The query could not be encoded
    #[error("failed to encode query: {0}")]
    Encode(String),
}

impl TransferFailure {
    /// Returns true if the timeout elapsed
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}
