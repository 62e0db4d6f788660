//! Core types and errors for the AXFR probe.
//!
//! This crate provides the foundational types shared by the probe crates:
//!
//! - **Types**: [`Domain`], [`Nameserver`], [`ResolvedAddress`] and the
//!   [`ZoneRecordSet`] produced by a successful transfer
//! - **Config**: [`TransferConfig`], the explicit knobs of a transfer attempt
//! - **Errors**: the [`AxfrError`] taxonomy and its [`TransferFailure`] causes
//!
//! # Example
//!
//! ```rust
//! use axfr_core::{Domain, Nameserver};
//!
//! let domain = Domain::new("example.com");
//! let ns = Nameserver::new("ns1.example.com.");
//! assert_eq!(domain.as_str(), "example.com");
//! assert_eq!(ns.to_string(), "ns1.example.com.");
//! ```

#![doc(html_root_url = "https://docs.rs/axfr-core/0.1.0")]

mod config;
mod error;
pub mod types;

pub use config::TransferConfig;
pub use error::{AxfrError, Result, TransferFailure};
pub use types::*;
