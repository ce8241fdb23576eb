//! Debian version ordering
//!
//! Native implementation of the rules `dpkg --compare-versions` applies:
//!
//! ```text
//! [epoch:]upstream_version[-debian_revision]
//! ```
//!
//! - epoch: unsigned integer, 0 when absent, compared numerically
//! - upstream / revision: compared left to right, alternating non-digit and
//!   digit runs. Non-digit runs compare character by character with `~`
//!   sorting before everything (even the end of the string), then letters,
//!   then all other characters. Digit runs compare numerically.
//!
//! ## Usage
//!
//! ```rust
//! use aptclean_core::drivers::{DebianVersion, DebianOrdering, Relation, VersionComparator};
//!
//! let a = DebianVersion::parse("1:2.0-1").unwrap();
//! let b = DebianVersion::parse("3.0").unwrap();
//! assert!(a > b);
//!
//! assert!(DebianOrdering.compare("1.0~rc1", Relation::Lt, "1.0"));
//! ```

use crate::drivers::traits::{Relation, VersionComparator};
use crate::errors::{CleanError, Result};
use std::cmp::Ordering;
use std::fmt;
use tracing::warn;

/// Parsed Debian version
#[derive(Debug, Clone)]
pub struct DebianVersion {
    pub epoch: u32,
    pub upstream: String,
    pub revision: String,
}

impl DebianVersion {
    /// Parse a version string the way dpkg does
    ///
    /// Surrounding whitespace is ignored. Rejects empty versions, embedded
    /// whitespace, a non-numeric epoch, an empty upstream part and an empty
    /// revision after a trailing `-`.
    pub fn parse(input: &str) -> Result<Self> {
        let s = input.trim();

        if s.is_empty() {
            return Err(CleanError::InvalidVersion("version string is empty".to_string()));
        }
        if s.chars().any(char::is_whitespace) {
            return Err(CleanError::InvalidVersion(format!(
                "version string has embedded spaces: {:?}",
                input
            )));
        }

        let (epoch, rest) = match s.split_once(':') {
            Some((epoch_str, rest)) => {
                if epoch_str.is_empty() || !epoch_str.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(CleanError::InvalidVersion(format!(
                        "epoch in version is not a number: {:?}",
                        input
                    )));
                }
                let epoch = epoch_str.parse::<u32>().map_err(|_| {
                    CleanError::InvalidVersion(format!("epoch in version is too big: {:?}", input))
                })?;
                if rest.is_empty() {
                    return Err(CleanError::InvalidVersion(format!(
                        "nothing after colon in version number: {:?}",
                        input
                    )));
                }
                (epoch, rest)
            }
            None => (0, s),
        };

        let (upstream, revision) = match rest.rsplit_once('-') {
            Some((upstream, revision)) => {
                if revision.is_empty() {
                    return Err(CleanError::InvalidVersion(format!(
                        "revision number is empty: {:?}",
                        input
                    )));
                }
                (upstream, revision)
            }
            None => (rest, ""),
        };

        if upstream.is_empty() {
            return Err(CleanError::InvalidVersion(format!(
                "version number is empty: {:?}",
                input
            )));
        }

        Ok(Self {
            epoch,
            upstream: upstream.to_string(),
            revision: revision.to_string(),
        })
    }
}

impl fmt::Display for DebianVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.epoch > 0 {
            write!(f, "{}:", self.epoch)?;
        }
        f.write_str(&self.upstream)?;
        if !self.revision.is_empty() {
            write!(f, "-{}", self.revision)?;
        }
        Ok(())
    }
}

impl Ord for DebianVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch
            .cmp(&other.epoch)
            .then_with(|| verrevcmp(&self.upstream, &other.upstream))
            .then_with(|| verrevcmp(&self.revision, &other.revision))
    }
}

impl PartialOrd for DebianVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// "1.0" and "1.0-0" are equal versions with different spellings.
impl PartialEq for DebianVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for DebianVersion {}

/// Sort weight of one byte inside a non-digit run (0 = end of string)
fn order(c: Option<u8>) -> i32 {
    match c {
        None => 0,
        Some(c) if c.is_ascii_digit() => 0,
        Some(c) if c.is_ascii_alphabetic() => c as i32,
        Some(b'~') => -1,
        Some(c) => c as i32 + 256,
    }
}

fn verrevcmp(a: &str, b: &str) -> Ordering {
    let a = a.as_bytes();
    let b = b.as_bytes();
    let (mut i, mut j) = (0usize, 0usize);

    let is_digit = |s: &[u8], k: usize| s.get(k).map_or(false, u8::is_ascii_digit);

    while i < a.len() || j < b.len() {
        while (i < a.len() && !is_digit(a, i)) || (j < b.len() && !is_digit(b, j)) {
            let ac = order(a.get(i).copied());
            let bc = order(b.get(j).copied());
            if ac != bc {
                return ac.cmp(&bc);
            }
            i += 1;
            j += 1;
        }

        while a.get(i) == Some(&b'0') {
            i += 1;
        }
        while b.get(j) == Some(&b'0') {
            j += 1;
        }

        let mut first_diff = Ordering::Equal;
        while is_digit(a, i) && is_digit(b, j) {
            if first_diff == Ordering::Equal {
                first_diff = a[i].cmp(&b[j]);
            }
            i += 1;
            j += 1;
        }

        if is_digit(a, i) {
            return Ordering::Greater;
        }
        if is_digit(b, j) {
            return Ordering::Less;
        }
        if first_diff != Ordering::Equal {
            return first_diff;
        }
    }

    Ordering::Equal
}

/// In-process comparator with dpkg semantics
#[derive(Debug, Clone, Copy, Default)]
pub struct DebianOrdering;

impl VersionComparator for DebianOrdering {
    fn compare(&self, a: &str, relation: Relation, b: &str) -> bool {
        match (DebianVersion::parse(a), DebianVersion::parse(b)) {
            (Ok(va), Ok(vb)) => relation.holds(va.cmp(&vb)),
            (Err(e), _) | (_, Err(e)) => {
                warn!(a, %relation, b, error = %e, "cannot compare versions");
                false
            }
        }
    }
}
