//! # axfr-cli
//!
//! Command-line front end for the AXFR probe.
//!
//! ## Features
//!
//! - **Zone transfer probe**: NS lookup, then one AXFR attempt per nameserver
//! - **Result files**: `<domain><nameserver>axfr.txt` per successful transfer
//! - **Config file**: defaults for timeout, port, output directory and naming
//! - **Verbose mode**: `--verbose` or `RUST_LOG` for internal tracing on stderr

pub mod cli;
pub mod config;
pub mod output;

pub use cli::run;
