//! Roster configuration via `roster.toml`
//!
//! On first open of a data directory, a default `roster.toml` is created.
//! To change settings, edit the file and reopen.

use std::path::Path;

use serde::{Deserialize, Serialize};

use roster_core::{Error, Result};
use roster_storage::DEFAULT_QUOTA_BYTES;

/// Config file name placed in the data directory.
pub const CONFIG_FILE_NAME: &str = "roster.toml";

/// How hard a write tries to reach the disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Durability {
    /// Atomic rename, no fsync
    Standard,
    /// fsync every write before it returns
    Always,
}

/// Configuration loaded from `roster.toml`.
///
/// # Example
///
/// ```toml
/// durability = "standard"
/// quota_bytes = 5242880
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterConfig {
    /// Durability mode: `"standard"` or `"always"`.
    #[serde(default = "default_durability_str")]
    pub durability: String,
    /// Total bytes the data directory may hold; `0` means unlimited.
    #[serde(default = "default_quota_bytes")]
    pub quota_bytes: u64,
}

fn default_durability_str() -> String {
    "standard".to_string()
}

fn default_quota_bytes() -> u64 {
    DEFAULT_QUOTA_BYTES as u64
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            durability: default_durability_str(),
            quota_bytes: default_quota_bytes(),
        }
    }
}

impl RosterConfig {
    /// Parse the durability string.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the string is not `"standard"` or `"always"`.
    pub fn durability_mode(&self) -> Result<Durability> {
        match self.durability.as_str() {
            "standard" => Ok(Durability::Standard),
            "always" => Ok(Durability::Always),
            other => Err(Error::InvalidConfig(format!(
                "invalid durability mode '{}' in {}, expected \"standard\" or \"always\"",
                other, CONFIG_FILE_NAME
            ))),
        }
    }

    /// Whether stores should fsync each write
    pub fn sync_writes(&self) -> Result<bool> {
        Ok(self.durability_mode()? == Durability::Always)
    }

    /// Storage quota, `None` when unlimited
    pub fn quota(&self) -> Option<usize> {
        match self.quota_bytes {
            0 => None,
            n => Some(usize::try_from(n).unwrap_or(usize::MAX)),
        }
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Roster data directory configuration
#
# Durability mode: "standard" (default) or "always"
#   "standard" = atomic replace of each collection file, no fsync
#   "always"   = fsync every write before it returns
durability = "standard"

# Maximum bytes stored across all collections (default 5 MiB).
# A write that would exceed it fails with "Could not save data".
# 0 = unlimited
quota_bytes = 5242880
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::InvalidConfig(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: RosterConfig = toml::from_str(&content).map_err(|e| {
            Error::InvalidConfig(format!(
                "failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.durability_mode()?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml())?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::InvalidConfig(format!("failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
