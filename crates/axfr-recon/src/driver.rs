//! The per-domain AXFR workflow.
//!
//! Looks up the domain's nameservers and tries a zone transfer against each
//! one, in the order the resolver returned them. Per-nameserver failures are
//! reported and skipped; anything else, such as a failed result write, ends
//! the run early.
//! Nothing here prints: every step is handed to a [`Reporter`].

use std::path::{Path, PathBuf};

use axfr_core::{AxfrError, Domain, Nameserver, Result, ZoneRecordSet};
use futures_util::future::join_all;
use tracing::debug;

use crate::lookup::NameserverDirectory;
use crate::transfer::ZoneTransfer;
use crate::writer::ResultWriter;

/// Receives progress of a run.
pub trait Reporter {
    /// The NS lookup failed; the run continues as if none were found.
    fn lookup_failed(&mut self, error: &AxfrError);

    /// The domain has no nameservers; the run ends.
    fn no_nameservers(&mut self, domain: &Domain);

    /// A transfer from `nameserver` is about to be attempted.
    fn attempting(&mut self, nameserver: &Nameserver);

    /// The transfer succeeded and was saved to `path`.
    fn saved(&mut self, nameserver: &Nameserver, path: &Path);

    /// The transfer failed.
    fn failed(&mut self, nameserver: &Nameserver, error: &AxfrError);
}

/// Where one nameserver stands in the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptState {
    /// Not tried yet
    NotAttempted,
    /// Transfer in progress
    Attempting,
    /// Zone saved to the given path
    Succeeded(PathBuf),
    /// Transfer failed
    Failed,
}

impl AttemptState {
    /// Returns true for `Succeeded` and `Failed`
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded(_) | Self::Failed)
    }
}

/// One nameserver and the outcome of its single attempt
#[derive(Debug, Clone)]
pub struct Attempt {
    /// Nameserver tried
    pub nameserver: Nameserver,
    /// Current state
    pub state: AttemptState,
}

impl Attempt {
    const fn new(nameserver: Nameserver) -> Self {
        Self {
            nameserver,
            state: AttemptState::NotAttempted,
        }
    }

    fn advance(&mut self, next: AttemptState) {
        debug_assert!(
            !self.state.is_terminal(),
            "attempt for {} already finished",
            self.nameserver
        );
        self.state = next;
    }
}

/// How a run ended.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// No nameservers were found (or the NS lookup failed)
    NoNameservers,
    /// Every nameserver was attempted
    Completed(Vec<Attempt>),
}

impl RunOutcome {
    /// Attempts made, in nameserver order
    #[must_use]
    pub fn attempts(&self) -> &[Attempt] {
        match self {
            Self::NoNameservers => &[],
            Self::Completed(attempts) => attempts,
        }
    }

    /// Number of successful transfers
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.attempts()
            .iter()
            .filter(|a| matches!(a.state, AttemptState::Succeeded(_)))
            .count()
    }
}

/// Runs the workflow for one domain.
pub struct Driver<L, T> {
    lookup: L,
    transfer: T,
    writer: ResultWriter,
    concurrent: bool,
}

impl<L: NameserverDirectory, T: ZoneTransfer> Driver<L, T> {
    /// Create a sequential driver
    pub const fn new(lookup: L, transfer: T, writer: ResultWriter) -> Self {
        Self {
            lookup,
            transfer,
            writer,
            concurrent: false,
        }
    }

    /// Start every transfer at once instead of one after another
    #[must_use]
    pub const fn concurrent(mut self, concurrent: bool) -> Self {
        self.concurrent = concurrent;
        self
    }

    /// Run the workflow for `domain`.
    ///
    /// # Errors
    ///
    /// Failures tied to one nameserver go to the reporter. Anything else,
    /// such as a failed result write, is returned and ends the run.
    pub async fn run(&self, domain: &Domain, reporter: &mut dyn Reporter) -> Result<RunOutcome> {
        let nameservers = match self.lookup.nameservers(domain).await {
            Ok(nameservers) => nameservers,
            Err(e) => {
                debug!(domain = %domain, error = %e, "NS lookup failed");
                reporter.lookup_failed(&e);
                Vec::new()
            }
        };

        if nameservers.is_empty() {
            reporter.no_nameservers(domain);
            return Ok(RunOutcome::NoNameservers);
        }

        debug!(domain = %domain, count = nameservers.len(), concurrent = self.concurrent, "starting run");
        let mut attempts: Vec<Attempt> = nameservers.into_iter().map(Attempt::new).collect();

        if self.concurrent {
            self.run_concurrent(domain, &mut attempts, reporter).await?;
        } else {
            for attempt in &mut attempts {
                reporter.attempting(&attempt.nameserver);
                attempt.advance(AttemptState::Attempting);
                let result = self.transfer.transfer(domain, &attempt.nameserver).await;
                self.settle(domain, attempt, result, reporter)?;
            }
        }

        Ok(RunOutcome::Completed(attempts))
    }

    async fn run_concurrent(
        &self,
        domain: &Domain,
        attempts: &mut [Attempt],
        reporter: &mut dyn Reporter,
    ) -> Result<()> {
        for attempt in attempts.iter_mut() {
            attempt.advance(AttemptState::Attempting);
        }

        let results = join_all(
            attempts
                .iter()
                .map(|attempt| self.transfer.transfer(domain, &attempt.nameserver)),
        )
        .await;

        for (attempt, result) in attempts.iter_mut().zip(results) {
            reporter.attempting(&attempt.nameserver);
            self.settle(domain, attempt, result, reporter)?;
        }
        Ok(())
    }

    /// Record the outcome of one transfer and persist it on success.
    fn settle(
        &self,
        domain: &Domain,
        attempt: &mut Attempt,
        result: Result<ZoneRecordSet>,
        reporter: &mut dyn Reporter,
    ) -> Result<()> {
        match result {
            Ok(records) => {
                let path = self.writer.write(domain, &attempt.nameserver, &records)?;
                reporter.saved(&attempt.nameserver, &path);
                attempt.advance(AttemptState::Succeeded(path));
            }
            Err(e) if e.is_per_nameserver() => {
                debug!(nameserver = %attempt.nameserver, error = %e, "transfer failed");
                reporter.failed(&attempt.nameserver, &e);
                attempt.advance(AttemptState::Failed);
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axfr_core::{ResolvedAddress, TransferConfig, TransferFailure};
    use std::net::Ipv4Addr;
    use std::sync::Mutex;
    use tempfile::TempDir;

    use crate::transfer::ZoneTransferClient;

    /// Directory with a fixed NS answer; hosts containing "noaddr" don't resolve.
    struct FixedDirectory {
        nameservers: std::result::Result<Vec<&'static str>, &'static str>,
    }

    #[async_trait]
    impl NameserverDirectory for FixedDirectory {
        async fn nameservers(&self, domain: &Domain) -> Result<Vec<Nameserver>> {
            self.nameservers
                .clone()
                .map(|names| names.into_iter().map(Nameserver::from).collect())
                .map_err(|reason| AxfrError::NameserverLookup {
                    domain: domain.clone(),
                    reason: reason.into(),
                })
        }

        async fn resolve(&self, nameserver: &Nameserver) -> Result<ResolvedAddress> {
            if nameserver.as_str().contains("noaddr") {
                return Err(AxfrError::NoAddress {
                    nameserver: nameserver.clone(),
                });
            }
            Ok(ResolvedAddress::new(nameserver.clone(), Ipv4Addr::new(192, 0, 2, 53)))
        }
    }

    fn directory(names: &[&'static str]) -> FixedDirectory {
        FixedDirectory {
            nameservers: Ok(names.to_vec()),
        }
    }

    /// Transfer that succeeds for hosts starting with "open" and records calls.
    #[derive(Default)]
    struct ScriptedTransfer {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ZoneTransfer for ScriptedTransfer {
        async fn transfer(&self, domain: &Domain, nameserver: &Nameserver) -> Result<ZoneRecordSet> {
            self.calls.lock().unwrap().push(nameserver.to_string());
            if nameserver.as_str().starts_with("broken") {
                return Err(AxfrError::InvalidDomain {
                    domain: domain.clone(),
                    reason: "empty label".into(),
                });
            }
            if nameserver.as_str().starts_with("open") {
                Ok(ZoneRecordSet::new(vec![
                    "@ 3600 IN SOA a. b. 1 2 3 4 5".into(),
                    "www 300 IN A 192.0.2.1".into(),
                ]))
            } else {
                Err(AxfrError::Transfer {
                    nameserver: nameserver.clone(),
                    address: Ipv4Addr::new(192, 0, 2, 53),
                    domain: domain.clone(),
                    cause: TransferFailure::Refused("REFUSED".into()),
                })
            }
        }
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl Reporter for Recorder {
        fn lookup_failed(&mut self, error: &AxfrError) {
            self.events.push(format!("lookup-failed {error}"));
        }

        fn no_nameservers(&mut self, domain: &Domain) {
            self.events.push(format!("none {domain}"));
        }

        fn attempting(&mut self, nameserver: &Nameserver) {
            self.events.push(format!("try {nameserver}"));
        }

        fn saved(&mut self, nameserver: &Nameserver, path: &Path) {
            let file = path.file_name().unwrap().to_string_lossy();
            self.events.push(format!("saved {nameserver} {file}"));
        }

        fn failed(&mut self, nameserver: &Nameserver, _error: &AxfrError) {
            self.events.push(format!("failed {nameserver}"));
        }
    }

    fn files_in(dir: &TempDir) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_every_nameserver_is_attempted_in_order() {
        let dir = TempDir::new().unwrap();
        let transfer = ScriptedTransfer::default();
        let driver = Driver::new(
            directory(&["closed1.example.com", "open1.example.com", "closed2.example.com"]),
            transfer,
            ResultWriter::new().output_dir(dir.path()),
        );

        let mut recorder = Recorder::default();
        let outcome = driver
            .run(&Domain::new("example.com"), &mut recorder)
            .await
            .unwrap();

        assert_eq!(
            *driver.transfer.calls.lock().unwrap(),
            vec!["closed1.example.com", "open1.example.com", "closed2.example.com"]
        );
        assert_eq!(
            recorder.events,
            vec![
                "try closed1.example.com",
                "failed closed1.example.com",
                "try open1.example.com",
                "saved open1.example.com example.comopen1.example.comaxfr.txt",
                "try closed2.example.com",
                "failed closed2.example.com",
            ]
        );
        assert_eq!(outcome.attempts().len(), 3);
        assert_eq!(outcome.succeeded(), 1);
        assert!(outcome.attempts().iter().all(|a| a.state.is_terminal()));
        assert_eq!(files_in(&dir), vec!["example.comopen1.example.comaxfr.txt"]);
    }

    #[tokio::test]
    async fn test_zero_nameservers_ends_run() {
        let dir = TempDir::new().unwrap();
        let driver = Driver::new(
            directory(&[]),
            ScriptedTransfer::default(),
            ResultWriter::new().output_dir(dir.path()),
        );

        let mut recorder = Recorder::default();
        let outcome = driver
            .run(&Domain::new("example.com"), &mut recorder)
            .await
            .unwrap();

        assert!(matches!(outcome, RunOutcome::NoNameservers));
        assert_eq!(recorder.events, vec!["none example.com"]);
        assert!(driver.transfer.calls.lock().unwrap().is_empty());
        assert!(files_in(&dir).is_empty());
    }

    #[tokio::test]
    async fn test_lookup_failure_counts_as_no_nameservers() {
        let driver = Driver::new(
            FixedDirectory {
                nameservers: Err("NXDOMAIN"),
            },
            ScriptedTransfer::default(),
            ResultWriter::new(),
        );

        let mut recorder = Recorder::default();
        let outcome = driver
            .run(&Domain::new("nope.invalid"), &mut recorder)
            .await
            .unwrap();

        assert!(matches!(outcome, RunOutcome::NoNameservers));
        assert_eq!(
            recorder.events,
            vec![
                "lookup-failed Error retrieving nameservers for nope.invalid: NXDOMAIN",
                "none nope.invalid",
            ]
        );
    }

    #[tokio::test]
    async fn test_unresolvable_nameserver_is_skipped_without_transfer() {
        let dir = TempDir::new().unwrap();
        // Resolution fails before any connection is opened.
        let client = ZoneTransferClient::new(directory(&[]), TransferConfig::new().port(9));
        let driver = Driver::new(
            directory(&["noaddr.example.com"]),
            client,
            ResultWriter::new().output_dir(dir.path()),
        );

        let mut recorder = Recorder::default();
        let outcome = driver
            .run(&Domain::new("example.com"), &mut recorder)
            .await
            .unwrap();

        assert_eq!(
            recorder.events,
            vec!["try noaddr.example.com", "failed noaddr.example.com"]
        );
        assert_eq!(outcome.attempts()[0].state, AttemptState::Failed);
        assert!(files_in(&dir).is_empty());
    }

    #[tokio::test]
    async fn test_write_failure_ends_run() {
        let dir = TempDir::new().unwrap();
        let driver = Driver::new(
            directory(&["open1.example.com", "open2.example.com"]),
            ScriptedTransfer::default(),
            ResultWriter::new().output_dir(dir.path().join("missing")),
        );

        let mut recorder = Recorder::default();
        let err = driver
            .run(&Domain::new("example.com"), &mut recorder)
            .await
            .unwrap_err();

        assert!(matches!(err, AxfrError::Write { .. }));
        assert_eq!(driver.transfer.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_domain_wide_failure_ends_run() {
        let dir = TempDir::new().unwrap();
        let driver = Driver::new(
            directory(&["closed.example.com", "broken.example.com", "open1.example.com"]),
            ScriptedTransfer::default(),
            ResultWriter::new().output_dir(dir.path()),
        );

        let mut recorder = Recorder::default();
        let err = driver
            .run(&Domain::new("example.com"), &mut recorder)
            .await
            .unwrap_err();

        assert!(matches!(err, AxfrError::InvalidDomain { .. }));
        assert_eq!(
            recorder.events,
            vec![
                "try closed.example.com",
                "failed closed.example.com",
                "try broken.example.com",
            ]
        );
        assert_eq!(driver.transfer.calls.lock().unwrap().len(), 2);
        assert!(files_in(&dir).is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_mode_reports_in_nameserver_order() {
        let dir = TempDir::new().unwrap();
        let driver = Driver::new(
            directory(&["open1.example.com", "closed.example.com", "open2.example.com"]),
            ScriptedTransfer::default(),
            ResultWriter::new().output_dir(dir.path()),
        )
        .concurrent(true);

        let mut recorder = Recorder::default();
        let outcome = driver
            .run(&Domain::new("example.com"), &mut recorder)
            .await
            .unwrap();

        assert_eq!(outcome.succeeded(), 2);
        assert_eq!(
            recorder.events,
            vec![
                "try open1.example.com",
                "saved open1.example.com example.comopen1.example.comaxfr.txt",
                "try closed.example.com",
                "failed closed.example.com",
                "try open2.example.com",
                "saved open2.example.com example.comopen2.example.comaxfr.txt",
            ]
        );
        assert_eq!(files_in(&dir).len(), 2);
    }
}
