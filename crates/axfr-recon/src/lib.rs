//! Nameserver discovery and AXFR zone transfers.
//!
//! The workflow for one domain:
//!
//! 1. [`lookup`]: NS records for the domain, then the first A record of each
//!    nameserver
//! 2. [`transfer`]: an AXFR session against the nameserver's address
//! 3. [`zone`]: the transferred records grouped into per-node text
//! 4. [`writer`]: one file per successful transfer
//!
//! [`driver`] ties the steps together and reports progress through a
//! [`Reporter`](driver::Reporter).

#![doc(html_root_url = "https://docs.rs/axfr-recon/0.1.0")]

pub mod driver;
pub mod lookup;
pub mod transfer;
pub mod writer;
pub mod zone;

pub use driver::{Attempt, AttemptState, Driver, Reporter, RunOutcome};
pub use lookup::{NameserverDirectory, SystemResolver};
pub use transfer::{ZoneTransfer, ZoneTransferClient};
pub use writer::{FileNaming, ResultWriter};
