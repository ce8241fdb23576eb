//! In-memory package table
//!
//! Answers oracle queries from a fixed table instead of the dpkg database.
//! Used by tests and by `aptclean explain --state <file>` to replay a
//! recorded package state.

use crate::drivers::traits::VersionOracle;
use crate::errors::{CleanError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Recorded state of one package
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate: Option<String>,
}

/// Oracle backed by a `name:architecture` keyed table
///
/// YAML form:
/// ```yaml
/// foo:amd64:
///   installed: "1.0"
///   candidate: "2.0"
/// bar:all:
///   candidate: "0.3-1"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaticOracle {
    packages: HashMap<String, PackageState>,
}

impl StaticOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a recorded state table from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            CleanError::Config(format!("Failed to read state file {}: {}", path.display(), e))
        })?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Record an installed version
    pub fn with_installed(mut self, name: &str, architecture: &str, version: &str) -> Self {
        self.entry(name, architecture).installed = Some(version.to_string());
        self
    }

    /// Record a candidate version
    pub fn with_candidate(mut self, name: &str, architecture: &str, version: &str) -> Self {
        self.entry(name, architecture).candidate = Some(version.to_string());
        self
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    fn entry(&mut self, name: &str, architecture: &str) -> &mut PackageState {
        self.packages.entry(key(name, architecture)).or_default()
    }
}

fn key(name: &str, architecture: &str) -> String {
    format!("{}:{}", name, architecture)
}

impl VersionOracle for StaticOracle {
    fn installed_version(&self, name: &str, architecture: &str) -> Result<Option<String>> {
        Ok(self
            .packages
            .get(&key(name, architecture))
            .and_then(|p| p.installed.clone())
            .filter(|v| !v.is_empty()))
    }

    fn candidate_version(&self, name: &str, architecture: &str) -> Result<String> {
        self.packages
            .get(&key(name, architecture))
            .and_then(|p| p.candidate.clone())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| CleanError::CandidateNotFound(key(name, architecture)))
    }
}
