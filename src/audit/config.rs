// src/audit/config.rs
// =============================================================================
// Settings for one audit run, built from the command line and validated
// before any file is touched.
// =============================================================================

use crate::error::ConfigurationError;
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "https://www.example.com";

pub const DEFAULT_KEYWORDS: &[&str] = &[
    "immigrate to brazil",
    "brazil visa",
    "brazil immigration",
];

#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Document root of the site.
    pub root: PathBuf,
    /// Public URL of the site, shown in the report header.
    pub base_url: String,
    /// Documents analyzed at the same time.
    pub workers: usize,
    pub keywords: Vec<String>,
    /// Where site-audit.md and the inventories are written.
    pub output_dir: PathBuf,
    /// Skip the root index.html during orphan detection.
    pub treat_root_as_reachable: bool,
    /// Request every external http(s) link.
    pub check_external: bool,
}

impl AuditConfig {
    /// Defaults for a site at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            output_dir: root.join("documentation"),
            root,
            base_url: DEFAULT_BASE_URL.to_string(),
            workers: default_workers(),
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            treat_root_as_reachable: true,
            check_external: false,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !self.root.exists() {
            return Err(ConfigurationError::MissingRoot(self.root.clone()));
        }
        if !self.root.is_dir() {
            return Err(ConfigurationError::NotADirectory(self.root.clone()));
        }
        if self.workers == 0 {
            return Err(ConfigurationError::NoWorkers);
        }
        Ok(())
    }
}

pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuditConfig::new("/srv/site");
        assert_eq!(config.output_dir, PathBuf::from("/srv/site/documentation"));
        assert_eq!(config.keywords.len(), 3);
        assert!(config.workers >= 1);
        assert!(config.treat_root_as_reachable);
        assert!(!config.check_external);
    }

    #[test]
    fn test_validate_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let config = AuditConfig::new(dir.path().join("missing"));
        assert!(matches!(config.validate(), Err(ConfigurationError::MissingRoot(_))));
    }

    #[test]
    fn test_validate_zero_workers() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AuditConfig::new(dir.path());
        config.workers = 0;
        assert!(matches!(config.validate(), Err(ConfigurationError::NoWorkers)));
    }
}
