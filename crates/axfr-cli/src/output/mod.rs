//! Console output for a probe run.

use std::io::{self, Stdout, Write};
use std::path::Path;

use axfr_core::{AxfrError, Domain, Nameserver};
use axfr_recon::Reporter;
use colored::Colorize;

/// Prints progress lines for every lookup, resolve and transfer step.
pub struct ConsoleReporter<W = Stdout> {
    out: W,
    color: bool,
}

impl ConsoleReporter<Stdout> {
    /// Reporter writing to standard output.
    pub fn stdout(color: bool) -> Self {
        Self::new(io::stdout(), color)
    }
}

impl<W: Write> ConsoleReporter<W> {
    /// Reporter writing to `out`.
    pub const fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    /// Consume the reporter and return its writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        // Console output is best effort; a closed pipe must not abort the run.
        let _ = writeln!(self.out, "{text}");
    }

    fn error(&self, text: String) -> String {
        if self.color {
            text.red().to_string()
        } else {
            text
        }
    }

    fn success(&self, text: String) -> String {
        if self.color {
            text.green().to_string()
        } else {
            text
        }
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn lookup_failed(&mut self, error: &AxfrError) {
        let text = self.error(error.to_string());
        self.line(&text);
    }

    fn no_nameservers(&mut self, domain: &Domain) {
        let text = self.error(format!("No nameservers found for {domain}. Exiting."));
        self.line(&text);
    }

    fn attempting(&mut self, nameserver: &Nameserver) {
        self.line(&format!("Trying AXFR from {nameserver}..."));
    }

    fn saved(&mut self, nameserver: &Nameserver, path: &Path) {
        let text = self.success(format!(
            "AXFR successful from {nameserver}. Records saved in {}.",
            path.display()
        ));
        self.line(&text);
    }

    fn failed(&mut self, nameserver: &Nameserver, error: &AxfrError) {
        let detail = self.error(error.to_string());
        self.line(&detail);
        self.line(&format!("AXFR failed from {nameserver}."));
    }
}
