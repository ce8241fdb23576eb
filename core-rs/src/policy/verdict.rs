//! Eviction verdicts and the branch that produced them

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeepReason {
    /// Newer than the installed version and it is what apt would install next
    PendingUpgrade,
    /// Not installed, but changed too recently to give up on
    GracePeriod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeleteReason {
    /// Newer than the installed version but no longer the candidate
    NotCandidate,
    /// Same as or older than the installed version
    Superseded,
    /// Not installed and past the grace period
    Expired,
}

/// Keep-or-delete decision for one cache file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "verdict", content = "reason", rename_all = "lowercase")]
pub enum EvictionVerdict {
    Keep(KeepReason),
    Delete(DeleteReason),
}

impl EvictionVerdict {
    pub fn is_delete(&self) -> bool {
        matches!(self, EvictionVerdict::Delete(_))
    }

    pub fn is_keep(&self) -> bool {
        !self.is_delete()
    }
}

impl fmt::Display for KeepReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            KeepReason::PendingUpgrade => "candidate for the next upgrade",
            KeepReason::GracePeriod => "not installed, within grace period",
        })
    }
}

impl fmt::Display for DeleteReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DeleteReason::NotCandidate => "newer than installed but not the candidate",
            DeleteReason::Superseded => "not newer than the installed version",
            DeleteReason::Expired => "not installed, grace period expired",
        })
    }
}

impl fmt::Display for EvictionVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvictionVerdict::Keep(reason) => write!(f, "keep ({})", reason),
            EvictionVerdict::Delete(reason) => write!(f, "delete ({})", reason),
        }
    }
}
