/*!
 * config/mod.rs
 * Run configuration for the archive cleaner (YAML format)
 *
 * Format:
 * ```yaml
 * archivesDir: /var/cache/apt/archives
 * dryRun: false
 * tools:
 *   dpkg: /usr/bin/dpkg
 *   dpkgQuery: /usr/bin/dpkg-query
 *   aptCache: /usr/bin/apt-cache
 *   aptConfig: /usr/bin/apt-config
 * ```
 *
 * Every field is optional. Without `archivesDir` the directory is resolved
 * through apt-config; tools without an override are looked up on PATH.
 */

mod apt_config;
mod tools;

pub use apt_config::{parse_dir_dump, resolve_archives_dir, DIR_KEYS};
pub use tools::{ToolOverrides, ToolPaths};

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{CleanError, Result};

/// Default location of the optional config file
pub const DEFAULT_CONFIG_PATH: &str = "/etc/aptclean/config.yaml";

/// Cleaner configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CleanConfig {
    /// Skip apt-config and use this directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archives_dir: Option<PathBuf>,
    /// Evaluate without deleting
    pub dry_run: bool,
    pub tools: ToolOverrides,
}

impl CleanConfig {
    /// Load config from the specified path
    ///
    /// # Example
    /// ```no_run
    /// use aptclean_core::CleanConfig;
    ///
    /// let config = CleanConfig::load("/etc/aptclean/config.yaml").unwrap();
    /// println!("dry run: {}", config.dry_run);
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = fs::read_to_string(path).map_err(|e| {
            CleanError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let config: CleanConfig = serde_yaml::from_str(&content).map_err(|e| {
            CleanError::Config(format!("Invalid config YAML in {}: {}", path.display(), e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load the explicit path if given, else the default path if it exists, else defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(dir) = &self.archives_dir {
            if dir.as_os_str().is_empty() {
                return Err(CleanError::Config("archivesDir must not be empty".to_string()));
            }
        }
        self.tools.validate()
    }

    /// Archives directory: configured override, otherwise asked from apt-config
    pub fn archives_dir(&self, tools: &ToolPaths) -> Result<PathBuf> {
        match &self.archives_dir {
            Some(dir) => Ok(dir.clone()),
            None => resolve_archives_dir(&tools.apt_config),
        }
    }
}
