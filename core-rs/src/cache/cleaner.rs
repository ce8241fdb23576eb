//! Archive cleaner - scans the apt archives directory and deletes
//! package files the eviction policy gives up on
//!
//! Files are handled one at a time in directory order. The listing is taken
//! once, before the first decision, so deletions never disturb it.

use crate::cache::filename::{PackageFileIdentity, ARCHIVE_EXTENSION};
use crate::cache::report::{CleanReport, FileOutcome, FileReport};
use crate::drivers::{VersionComparator, VersionOracle};
use crate::errors::{CleanError, Result};
use crate::policy::{EvictionPolicy, EvictionVerdict};
use chrono::{DateTime, Utc};
use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// One `.deb` file found in the archives directory
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub file_name: String,
    pub size_bytes: u64,
    /// Status-change time (ctime), not modification time
    pub changed_at: DateTime<Utc>,
}

/// Read the status-change time of a file
#[cfg(unix)]
pub fn status_change_time(metadata: &Metadata) -> Result<DateTime<Utc>> {
    use std::os::unix::fs::MetadataExt;

    DateTime::from_timestamp(metadata.ctime(), metadata.ctime_nsec() as u32).ok_or_else(|| {
        CleanError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("ctime out of range: {}", metadata.ctime()),
        ))
    })
}

#[cfg(not(unix))]
pub fn status_change_time(_metadata: &Metadata) -> Result<DateTime<Utc>> {
    Err(CleanError::Io(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "status-change time is only available on unix",
    )))
}

/// Scanner/deleter for one archives directory
pub struct ArchiveCleaner<O, C> {
    archives_dir: PathBuf,
    policy: EvictionPolicy<O, C>,
    dry_run: bool,
}

impl<O: VersionOracle, C: VersionComparator> ArchiveCleaner<O, C> {
    pub fn new(archives_dir: PathBuf, policy: EvictionPolicy<O, C>) -> Self {
        Self {
            archives_dir,
            policy,
            dry_run: false,
        }
    }

    /// Evaluate everything but delete nothing
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn archives_dir(&self) -> &Path {
        &self.archives_dir
    }

    pub fn policy(&self) -> &EvictionPolicy<O, C> {
        &self.policy
    }

    /// List `.deb` files in the archives directory
    ///
    /// Directories and other extensions are ignored. Failing to read the
    /// directory is fatal; a file that vanishes or cannot be stat'ed is
    /// left out with a warning.
    pub fn scan(&self) -> Result<Vec<CacheEntry>> {
        let list_err = |source: std::io::Error| CleanError::ListDir {
            path: self.archives_dir.clone(),
            source,
        };

        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.archives_dir).map_err(list_err)? {
            let entry = entry.map_err(list_err)?;
            let path = entry.path();

            if path.extension().and_then(|s| s.to_str()) != Some(ARCHIVE_EXTENSION) {
                continue;
            }

            let file_name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    warn!(file = ?raw, "skipping non UTF-8 file name");
                    continue;
                }
            };

            // DirEntry::metadata does not follow symlinks
            let metadata = match entry.metadata() {
                Ok(m) => m,
                Err(e) => {
                    warn!(file = %file_name, error = %e, "cannot stat");
                    continue;
                }
            };
            if metadata.is_dir() {
                continue;
            }

            match status_change_time(&metadata) {
                Ok(changed_at) => entries.push(CacheEntry {
                    file_name,
                    size_bytes: metadata.len(),
                    changed_at,
                }),
                Err(e) => warn!(file = %file_name, error = %e, "cannot read status-change time"),
            }
        }

        Ok(entries)
    }

    /// Stat a single file of the archives directory by name
    pub fn entry(&self, file_name: &str) -> Result<CacheEntry> {
        let metadata = fs::symlink_metadata(self.archives_dir.join(file_name))?;
        Ok(CacheEntry {
            file_name: file_name.to_string(),
            size_bytes: metadata.len(),
            changed_at: status_change_time(&metadata)?,
        })
    }

    /// Parse and decide one entry; `Err` means the file gets no verdict
    pub fn evaluate(
        &self,
        entry: &CacheEntry,
        now: DateTime<Utc>,
    ) -> (Option<PackageFileIdentity>, Result<EvictionVerdict>) {
        let identity = match PackageFileIdentity::parse(&entry.file_name) {
            Ok(identity) => identity,
            Err(e) => return (None, Err(e)),
        };
        let verdict = self.policy.decide_at(&identity, entry.changed_at, now);
        (Some(identity), verdict)
    }

    /// Decide every named file without touching it
    pub fn explain(&self, file_names: &[String], now: DateTime<Utc>) -> CleanReport {
        let mut report = CleanReport::new(self.archives_dir.clone(), true, now);

        for file_name in file_names {
            let file = match self.entry(file_name) {
                Ok(entry) => self.report_for(&entry, now, false),
                Err(e) => FileReport {
                    file_name: file_name.clone(),
                    identity: PackageFileIdentity::parse(file_name).ok(),
                    size_bytes: 0,
                    changed_at: None,
                    outcome: FileOutcome::Skipped { error: e.to_string() },
                },
            };
            report.files.push(file);
        }

        report
    }

    /// Full run against the current time
    pub fn run(&self) -> Result<CleanReport> {
        self.run_at(Utc::now())
    }

    /// Full run against an explicit clock
    ///
    /// Only listing errors are returned; per-file problems end up in the
    /// report and the run moves on.
    pub fn run_at(&self, now: DateTime<Utc>) -> Result<CleanReport> {
        info!(archives_dir = %self.archives_dir.display(), dry_run = self.dry_run, "scanning");
        let entries = self.scan()?;

        let mut report = CleanReport::new(self.archives_dir.clone(), self.dry_run, now);
        for entry in &entries {
            report.files.push(self.report_for(entry, now, !self.dry_run));
        }

        info!(
            files = report.files.len(),
            deleted = report.deleted(),
            kept = report.kept(),
            skipped = report.skipped(),
            failed = report.failed(),
            "run finished"
        );
        Ok(report)
    }

    fn report_for(&self, entry: &CacheEntry, now: DateTime<Utc>, delete: bool) -> FileReport {
        info!(file = %entry.file_name, "evaluating");
        let (identity, verdict) = self.evaluate(entry, now);

        let outcome = match verdict {
            Err(e) => {
                warn!(file = %entry.file_name, error = %e, "skipped");
                FileOutcome::Skipped { error: e.to_string() }
            }
            Ok(EvictionVerdict::Keep(reason)) => {
                info!(file = %entry.file_name, outcome = "kept", reason = %reason, "decision");
                FileOutcome::Kept { reason }
            }
            Ok(EvictionVerdict::Delete(reason)) if !delete => {
                info!(
                    file = %entry.file_name,
                    outcome = "would-delete",
                    reason = %reason,
                    "decision"
                );
                FileOutcome::WouldDelete { reason }
            }
            Ok(EvictionVerdict::Delete(reason)) => match self.delete_file(&entry.file_name) {
                Ok(()) => {
                    info!(
                        file = %entry.file_name,
                        outcome = "deleted",
                        reason = %reason,
                        "decision"
                    );
                    FileOutcome::Deleted { reason }
                }
                Err(e) => {
                    warn!(
                        file = %entry.file_name,
                        reason = %reason,
                        error = %e,
                        "delete failed"
                    );
                    FileOutcome::DeleteFailed { reason, error: e.to_string() }
                }
            },
        };

        FileReport {
            file_name: entry.file_name.clone(),
            identity,
            size_bytes: entry.size_bytes,
            changed_at: Some(entry.changed_at),
            outcome,
        }
    }

    fn delete_file(&self, file_name: &str) -> std::io::Result<()> {
        fs::remove_file(self.archives_dir.join(file_name))
    }
}
