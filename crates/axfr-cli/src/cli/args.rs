//! Command-line argument definitions using clap.

use clap::Parser;
use std::path::PathBuf;

/// Attempt a DNS zone transfer (AXFR) against every nameserver of a domain
///
/// Each successful transfer is saved to `<domain><nameserver>axfr.txt`.
/// Failures are reported and the next nameserver is tried.
#[derive(Parser, Debug)]
#[command(name = "axfr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Domain whose zone to request (e.g., example.com)
    pub domain: String,

    /// Seconds allowed for each zone transfer [default: 15]
    #[arg(short, long, env = "AXFR_TIMEOUT", value_name = "SECS")]
    pub timeout: Option<u64>,

    /// TCP port nameservers are contacted on [default: 53]
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Directory result files are written to [default: current directory]
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Replace characters outside [A-Za-z0-9._-] in result file names
    #[arg(long)]
    pub sanitize_filenames: bool,

    /// Try all nameservers at once instead of one after another
    #[arg(long)]
    pub concurrent: bool,

    /// Config file to read instead of the default location
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log internal details to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}
