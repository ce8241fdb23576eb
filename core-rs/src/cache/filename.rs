//! Cache file name parser
//!
//! apt stores downloads as `<name>_<version>_<architecture>.deb`.
//! Versions containing an epoch are stored with `:` escaped as `%3a`.
//! The parsed segments keep that escaping; `package_version` undoes it.

use crate::errors::{CleanError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Extension of package archives in the apt cache
pub const ARCHIVE_EXTENSION: &str = "deb";

const ARCHIVE_SUFFIX: &str = ".deb";
const SEGMENT_SEPARATOR: char = '_';

/// Package identity embedded in a cache file name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageFileIdentity {
    pub name: String,
    pub version: String,
    pub architecture: String,
}

impl PackageFileIdentity {
    /// Parse a cache file base name
    ///
    /// The `.deb` suffix is stripped when present. The rest must split into
    /// exactly three non-empty `_`-separated segments.
    ///
    /// # Example
    /// ```
    /// use aptclean_core::PackageFileIdentity;
    ///
    /// let id = PackageFileIdentity::parse("foo_2.0_amd64.deb").unwrap();
    /// assert_eq!(id.name, "foo");
    /// assert_eq!(id.version, "2.0");
    /// assert_eq!(id.architecture, "amd64");
    /// ```
    pub fn parse(filename: &str) -> Result<Self> {
        let stem = filename.strip_suffix(ARCHIVE_SUFFIX).unwrap_or(filename);
        let parts: Vec<&str> = stem.split(SEGMENT_SEPARATOR).collect();

        match parts.as_slice() {
            [name, version, architecture]
                if !name.is_empty() && !version.is_empty() && !architecture.is_empty() =>
            {
                Ok(Self {
                    name: name.to_string(),
                    version: version.to_string(),
                    architecture: architecture.to_string(),
                })
            }
            _ => Err(CleanError::ParseFailure(filename.to_string())),
        }
    }

    /// Version in the form dpkg reports it (`%3a` decoded back to `:`)
    pub fn package_version(&self) -> String {
        self.version.replace("%3a", ":").replace("%3A", ":")
    }

    /// `name:architecture`, the package spec understood by dpkg-query and apt-cache
    pub fn package_spec(&self) -> String {
        format!("{}:{}", self.name, self.architecture)
    }

    /// Rebuild the cache file name this identity was parsed from
    pub fn file_name(&self) -> String {
        format!(
            "{}_{}_{}{}",
            self.name, self.version, self.architecture, ARCHIVE_SUFFIX
        )
    }
}

impl fmt::Display for PackageFileIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.name, self.version, self.architecture)
    }
}
