//! Eviction policy for cached package archives
//!
//! Decides, for one parsed cache file, whether it can be deleted. Three
//! sources are reconciled: the version in the file name, the installed
//! version and the candidate version. Branch order:
//!
//! ```text
//! installed?
//!  ├─ yes: file version > installed?
//!  │        ├─ yes: candidate == file version ? Keep(PendingUpgrade) : Delete(NotCandidate)
//!  │        └─ no:  Delete(Superseded)
//!  └─ no:  ctime older than MAX_ELAPSED ? Delete(Expired) : Keep(GracePeriod)
//! ```
//!
//! A failed candidate lookup is returned as an error and yields no verdict.
//! A failed installed lookup counts as "not installed".

mod verdict;

pub use verdict::{DeleteReason, EvictionVerdict, KeepReason};

use crate::cache::PackageFileIdentity;
use crate::drivers::{Relation, VersionComparator, VersionOracle};
use crate::errors::Result;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::{debug, info};

/// Minimum age before a cached file of an uninstalled package may go
pub const MAX_ELAPSED: Duration = Duration::from_secs(6 * 24 * 60 * 60);

/// Whether a file whose status last changed at `changed_at` is past the grace period
///
/// Exactly `MAX_ELAPSED` is not expired. A change time in the future never is.
pub fn is_expired(changed_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    match now.signed_duration_since(changed_at).to_std() {
        Ok(elapsed) => elapsed > MAX_ELAPSED,
        Err(_) => false,
    }
}

/// Decision engine over an oracle and a comparator
#[derive(Debug, Clone)]
pub struct EvictionPolicy<O, C> {
    oracle: O,
    comparator: C,
}

impl<O: VersionOracle, C: VersionComparator> EvictionPolicy<O, C> {
    pub fn new(oracle: O, comparator: C) -> Self {
        Self { oracle, comparator }
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Decide against the current time
    pub fn decide(
        &self,
        identity: &PackageFileIdentity,
        changed_at: DateTime<Utc>,
    ) -> Result<EvictionVerdict> {
        self.decide_at(identity, changed_at, Utc::now())
    }

    /// Decide against an explicit clock
    ///
    /// # Arguments
    /// * `identity` - Parsed cache file name
    /// * `changed_at` - Status-change time (ctime) of the cache file
    /// * `now` - Reference time for the grace period
    pub fn decide_at(
        &self,
        identity: &PackageFileIdentity,
        changed_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<EvictionVerdict> {
        let package = identity.package_spec();
        // Compared exactly as it appears in the file name, `%3a` included
        let version = identity.version.as_str();

        let installed = match self
            .oracle
            .installed_version(&identity.name, &identity.architecture)
        {
            Ok(installed) => installed,
            Err(e) => {
                debug!(
                    package = %package,
                    error = %e,
                    "installed lookup failed, treating as not installed"
                );
                None
            }
        };

        let verdict = match installed {
            Some(installed) => {
                info!(package = %package, installed = %installed, "installed");

                // Incomparable versions land here as "not newer" and get deleted
                if self.comparator.compare(version, Relation::Gt, &installed) {
                    debug!(
                        package = %package,
                        version,
                        installed = %installed,
                        "cached version is newer"
                    );
                    let candidate = self
                        .oracle
                        .candidate_version(&identity.name, &identity.architecture)?;
                    info!(package = %package, candidate = %candidate, "candidate");

                    if candidate != version {
                        EvictionVerdict::Delete(DeleteReason::NotCandidate)
                    } else {
                        EvictionVerdict::Keep(KeepReason::PendingUpgrade)
                    }
                } else {
                    EvictionVerdict::Delete(DeleteReason::Superseded)
                }
            }
            None => {
                info!(package = %package, changed_at = %changed_at, "not installed");
                if is_expired(changed_at, now) {
                    EvictionVerdict::Delete(DeleteReason::Expired)
                } else {
                    EvictionVerdict::Keep(KeepReason::GracePeriod)
                }
            }
        };

        debug!(package = %package, verdict = %verdict, "decided");
        Ok(verdict)
    }
}
