//! Configuration management.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// CLI configuration.
///
/// Every field is a default that the matching command-line flag overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Seconds allowed for each zone transfer.
    pub timeout_secs: Option<u64>,

    /// TCP port nameservers are contacted on.
    pub port: Option<u16>,

    /// Directory result files are written to.
    pub output_dir: Option<PathBuf>,

    /// Sanitize result file names.
    #[serde(default)]
    pub sanitize_filenames: bool,

    /// Try all nameservers at once.
    #[serde(default)]
    pub concurrent: bool,
}

impl Config {
    /// Get the default config file path.
    pub fn path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("org", "axfr-probe", "axfr")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from the default location.
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        let Ok(path) = Self::path() else {
            return Ok(Self::default());
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from an explicit file, which must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.timeout_secs.is_none());
        assert!(config.output_dir.is_none());
        assert!(!config.sanitize_filenames);
        assert!(!config.concurrent);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "timeout_secs = 5\nport = 5353\noutput_dir = \"/var/tmp/zones\"\nsanitize_filenames = true"
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.timeout_secs, Some(5));
        assert_eq!(config.port, Some(5353));
        assert_eq!(config.output_dir, Some(PathBuf::from("/var/tmp/zones")));
        assert!(config.sanitize_filenames);
        assert!(!config.concurrent);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(Config::load_from(&dir.path().join("absent.toml")).is_err());
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "timeout_secs = \"soon\"").unwrap();
        assert!(Config::load_from(file.path()).is_err());
    }
}
