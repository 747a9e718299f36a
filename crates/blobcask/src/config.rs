//! Cask configuration with environment variable and file-based loading.
//!
//! Environment variables:
//! - `BLOBCASK_PATH`: Root directory for blob storage
//!
//! Default root: `~/.blobcask/objects`

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Configuration for a blob cask.
///
/// The root is fixed at construction time; there is no process-wide
/// mutable state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaskConfig {
    /// Root directory holding one file per blob id. May be a UNC or local
    /// path on a shared file location.
    pub root: PathBuf,
}

impl Default for CaskConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
        }
    }
}

/// Get the default cask root (~/.blobcask/objects).
fn default_root() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".blobcask").join("objects"))
        .unwrap_or_else(|| PathBuf::from(".blobcask/objects"))
}

impl CaskConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults.
    pub fn from_env() -> Result<Self> {
        let root = env::var("BLOBCASK_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_root());

        Ok(Self { root })
    }

    /// Load configuration from a TOML file, falling back to environment.
    ///
    /// The file should contain a `[cask]` section:
    /// ```toml
    /// [cask]
    /// root = "/srv/share/blobcask"
    /// ```
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        let table: toml::Table = contents
            .parse()
            .with_context(|| format!("failed to parse TOML: {}", path.display()))?;

        if let Some(cask_section) = table.get("cask") {
            let config: CaskConfig = cask_section
                .clone()
                .try_into()
                .context("failed to parse [cask] section")?;
            Ok(config)
        } else {
            Self::from_env()
        }
    }

    /// Create a config with a specific root.
    pub fn with_root(path: impl Into<PathBuf>) -> Self {
        Self { root: path.into() }
    }
}
