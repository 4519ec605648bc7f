//! Finder configuration describing where revved assets are listed from.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::listing::DirectoryLister;

/// File name searched for when discovering configuration in a directory.
pub const DEFAULT_CONFIG_FILE: &str = "revved.config.json";

/// Discoverable configuration for the on-disk listing collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FinderConfig {
    /// Directory that candidate paths are listed relative to.
    pub root: PathBuf,
    /// Whether dot-files and dot-directories are considered.
    pub include_hidden: bool,
    /// Directory names that are never descended into.
    pub excluded_dirs: Vec<String>,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            include_hidden: false,
            excluded_dirs: vec!["node_modules".into(), ".git".into()],
        }
    }
}

impl FinderConfig {
    /// Attempt to load configuration from the provided directory.
    ///
    /// When the configuration file does not exist or fails to parse we fall back to default
    /// values so callers can keep resolving with sensible assumptions.
    pub fn discover(dir: &Path) -> Self {
        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        Self::from_path(&candidate).unwrap_or_default()
    }

    /// Read configuration from a specific JSON file.
    pub fn from_path(path: &Path) -> Option<Self> {
        let content = fs::read_to_string(path).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Read configuration from a file the caller asked for explicitly, reporting failures.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Build the directory lister described by this configuration.
    pub fn to_lister(&self) -> DirectoryLister {
        self.excluded_dirs.iter().fold(
            DirectoryLister::new(&self.root).include_hidden(self.include_hidden),
            |lister, name| lister.exclude_dir(name.clone()),
        )
    }
}
