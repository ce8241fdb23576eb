//! Locations of the package manager binaries

use crate::errors::{CleanError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Per-tool path overrides from the config file
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dpkg: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dpkg_query: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apt_cache: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apt_config: Option<PathBuf>,
}

impl ToolOverrides {
    pub fn validate(&self) -> Result<()> {
        let entries = [
            ("dpkg", &self.dpkg),
            ("dpkgQuery", &self.dpkg_query),
            ("aptCache", &self.apt_cache),
            ("aptConfig", &self.apt_config),
        ];
        for (key, value) in entries {
            if let Some(path) = value {
                if path.as_os_str().is_empty() {
                    return Err(CleanError::Config(format!("tools.{} must not be empty", key)));
                }
            }
        }
        Ok(())
    }
}

/// Resolved binaries used by the dpkg driver and apt-config lookup
#[derive(Debug, Clone, PartialEq)]
pub struct ToolPaths {
    pub dpkg: PathBuf,
    pub dpkg_query: PathBuf,
    pub apt_cache: PathBuf,
    pub apt_config: PathBuf,
}

impl ToolPaths {
    /// Resolve every tool, preferring overrides over a PATH lookup
    ///
    /// A tool that cannot be found is fatal for the whole run.
    pub fn discover(overrides: &ToolOverrides) -> Result<Self> {
        Ok(Self {
            dpkg: locate("dpkg", overrides.dpkg.as_deref())?,
            dpkg_query: locate("dpkg-query", overrides.dpkg_query.as_deref())?,
            apt_cache: locate("apt-cache", overrides.apt_cache.as_deref())?,
            apt_config: locate("apt-config", overrides.apt_config.as_deref())?,
        })
    }
}

fn locate(tool: &str, configured: Option<&Path>) -> Result<PathBuf> {
    // An override is still checked so a typo fails at start-up, not per file
    let found = match configured {
        Some(path) => which::which(path),
        None => which::which(tool),
    }
    .map_err(|source| CleanError::ToolNotFound {
        tool: configured
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| tool.to_string()),
        source,
    })?;

    debug!(tool, path = %found.display(), "located");
    Ok(found)
}
