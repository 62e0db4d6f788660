//! axfr - DNS zone transfer probe
//!
//! Tries an AXFR against every nameserver of a domain and saves what it gets.

use std::process::ExitCode;

use anyhow::Result;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    axfr_cli::run().await
}
