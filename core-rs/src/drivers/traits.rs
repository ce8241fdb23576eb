//! Driver traits for package state queries
//!
//! The eviction policy never talks to dpkg or apt directly. It asks a
//! [`VersionOracle`] for versions and a [`VersionComparator`] for ordering.
//! Implementations:
//! - DpkgDriver (dpkg-query, apt-cache, dpkg subprocesses)
//! - StaticOracle (in-memory package table)
//! - DebianOrdering (native version comparison)

use crate::errors::{CleanError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Relational operator between two versions
///
/// Spelled the way `dpkg --compare-versions` expects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relation {
    Eq,
    Gt,
    Lt,
    Ge,
    Le,
}

impl Relation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::Eq => "eq",
            Relation::Gt => "gt",
            Relation::Lt => "lt",
            Relation::Ge => "ge",
            Relation::Le => "le",
        }
    }

    /// Whether an ordering result satisfies this relation
    pub fn holds(&self, ordering: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering::*;
        match self {
            Relation::Eq => ordering == Equal,
            Relation::Gt => ordering == Greater,
            Relation::Lt => ordering == Less,
            Relation::Ge => ordering != Less,
            Relation::Le => ordering != Greater,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Relation {
    type Err = CleanError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "eq" => Ok(Relation::Eq),
            "gt" => Ok(Relation::Gt),
            "lt" => Ok(Relation::Lt),
            "ge" => Ok(Relation::Ge),
            "le" => Ok(Relation::Le),
            other => Err(CleanError::Config(format!("Unknown relation: {}", other))),
        }
    }
}

/// Source of installed and candidate versions
pub trait VersionOracle {
    /// Installed version of `name:architecture`
    ///
    /// `Ok(None)` means the package is not installed. That is a normal
    /// outcome, not an error.
    fn installed_version(&self, name: &str, architecture: &str) -> Result<Option<String>>;

    /// Best version the configured repositories offer for `name:architecture`
    ///
    /// Having no candidate at all is an error.
    fn candidate_version(&self, name: &str, architecture: &str) -> Result<String>;
}

/// Debian version ordering
pub trait VersionComparator {
    /// Whether `a <relation> b` holds
    ///
    /// Versions that cannot be compared make every relation false.
    fn compare(&self, a: &str, relation: Relation, b: &str) -> bool;
}

impl<T: VersionOracle + ?Sized> VersionOracle for &T {
    fn installed_version(&self, name: &str, architecture: &str) -> Result<Option<String>> {
        (**self).installed_version(name, architecture)
    }

    fn candidate_version(&self, name: &str, architecture: &str) -> Result<String> {
        (**self).candidate_version(name, architecture)
    }
}

impl<T: VersionComparator + ?Sized> VersionComparator for &T {
    fn compare(&self, a: &str, relation: Relation, b: &str) -> bool {
        (**self).compare(a, relation, b)
    }
}

impl<T: VersionOracle + ?Sized> VersionOracle for Box<T> {
    fn installed_version(&self, name: &str, architecture: &str) -> Result<Option<String>> {
        (**self).installed_version(name, architecture)
    }

    fn candidate_version(&self, name: &str, architecture: &str) -> Result<String> {
        (**self).candidate_version(name, architecture)
    }
}

impl<T: VersionComparator + ?Sized> VersionComparator for Box<T> {
    fn compare(&self, a: &str, relation: Relation, b: &str) -> bool {
        (**self).compare(a, relation, b)
    }
}
