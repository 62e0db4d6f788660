//! CLI argument parsing and the probe run.

pub mod args;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use args::Cli;
use axfr_core::{Domain, TransferConfig};
use axfr_recon::{Driver, FileNaming, Reporter, ResultWriter, RunOutcome, SystemResolver, ZoneTransferClient};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::output::ConsoleReporter;

/// Settings for one run, after merging flags, environment and config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Transfer timeout and port
    pub transfer: TransferConfig,
    /// Where result files go
    pub output_dir: Option<PathBuf>,
    /// Result file naming scheme
    pub naming: FileNaming,
    /// Try all nameservers at once
    pub concurrent: bool,
}

impl Settings {
    /// Merge command-line values over config file values.
    pub fn resolve(cli: &Cli, config: &Config) -> Self {
        let mut transfer = TransferConfig::new();
        if let Some(secs) = cli.timeout.or(config.timeout_secs) {
            transfer = transfer.timeout(Duration::from_secs(secs));
        }
        if let Some(port) = cli.port.or(config.port) {
            transfer = transfer.port(port);
        }

        let naming = if cli.sanitize_filenames || config.sanitize_filenames {
            FileNaming::Sanitized
        } else {
            FileNaming::Literal
        };

        Self {
            transfer,
            output_dir: cli.output_dir.clone().or_else(|| config.output_dir.clone()),
            naming,
            concurrent: cli.concurrent || config.concurrent,
        }
    }

    fn writer(&self) -> ResultWriter {
        let writer = ResultWriter::new().naming(self.naming);
        match &self.output_dir {
            Some(dir) => writer.output_dir(dir),
            None => writer,
        }
    }
}

/// Run the CLI application.
pub async fn run() -> Result<ExitCode> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => return Ok(argument_error(&e)),
    };

    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let settings = Settings::resolve(&cli, &config);
    debug!(?settings, "resolved settings");

    let mut reporter = ConsoleReporter::stdout(!cli.no_color);
    probe(&Domain::new(cli.domain), &settings, &mut reporter).await
}

/// Probe every nameserver of `domain` with the system resolver.
pub async fn probe(
    domain: &Domain,
    settings: &Settings,
    reporter: &mut dyn Reporter,
) -> Result<ExitCode> {
    let resolver = Arc::new(SystemResolver::new()?);
    let driver = Driver::new(
        Arc::clone(&resolver),
        ZoneTransferClient::new(resolver, settings.transfer),
        settings.writer(),
    )
    .concurrent(settings.concurrent);

    let outcome = driver.run(domain, reporter).await?;
    Ok(ExitCode::from(exit_status(&outcome)))
}

/// Exit status for a finished run: 1 only when there was nothing to try.
pub fn exit_status(outcome: &RunOutcome) -> u8 {
    match outcome {
        RunOutcome::NoNameservers => 1,
        RunOutcome::Completed(attempts) => {
            debug!(
                attempted = attempts.len(),
                succeeded = outcome.succeeded(),
                "run complete"
            );
            0
        }
    }
}

/// Help and version go out as usual; any other parse error prints usage.
fn argument_error(err: &clap::Error) -> ExitCode {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = err.print();
            ExitCode::SUCCESS
        }
        _ => {
            println!("{}", Cli::command().render_usage());
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .try_init()
        .ok();
}
