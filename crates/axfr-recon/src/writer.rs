//! Persisting transferred zones.

use std::path::{Path, PathBuf};

use axfr_core::{AxfrError, Domain, Nameserver, Result, ZoneRecordSet};
use tracing::debug;

/// Fixed suffix of every result file name.
pub const FILE_SUFFIX: &str = "axfr.txt";

/// How result file names are derived from domain and nameserver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FileNaming {
    /// Plain concatenation, `<domain><nameserver>axfr.txt`
    #[default]
    Literal,
    /// Concatenation with every character outside `[A-Za-z0-9._-]`
    /// replaced by `_`
    Sanitized,
}

/// Writes one file per successful transfer
#[derive(Debug, Clone, Default)]
pub struct ResultWriter {
    output_dir: Option<PathBuf>,
    naming: FileNaming,
}

impl ResultWriter {
    /// Writer that places files in the current directory
    #[must_use]
    pub const fn new() -> Self {
        Self {
            output_dir: None,
            naming: FileNaming::Literal,
        }
    }

    /// Place files in `dir` instead of the current directory
    #[must_use]
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Set the file naming scheme
    #[must_use]
    pub const fn naming(mut self, naming: FileNaming) -> Self {
        self.naming = naming;
        self
    }

    /// File name for a transfer of `domain` from `nameserver`
    #[must_use]
    pub fn file_name(&self, domain: &Domain, nameserver: &Nameserver) -> String {
        match self.naming {
            FileNaming::Literal => format!("{domain}{nameserver}{FILE_SUFFIX}"),
            FileNaming::Sanitized => format!(
                "{}{}{FILE_SUFFIX}",
                sanitize(domain.as_str()),
                sanitize(nameserver.as_str())
            ),
        }
    }

    /// Full path of the result file
    #[must_use]
    pub fn path_for(&self, domain: &Domain, nameserver: &Nameserver) -> PathBuf {
        let name = self.file_name(domain, nameserver);
        self.output_dir
            .as_deref()
            .map_or_else(|| PathBuf::from(&name), |dir| dir.join(&name))
    }

    /// Write `records` and return the path written.
    ///
    /// An existing file of the same name is overwritten.
    pub fn write(
        &self,
        domain: &Domain,
        nameserver: &Nameserver,
        records: &ZoneRecordSet,
    ) -> Result<PathBuf> {
        let path = self.path_for(domain, nameserver);
        write_text(&path, &records.to_text())?;
        debug!(path = %path.display(), nodes = records.len(), "zone written");
        Ok(path)
    }
}

fn write_text(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text).map_err(|source| AxfrError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn sanitize(part: &str) -> String {
    part.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
