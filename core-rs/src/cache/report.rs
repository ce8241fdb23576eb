//! Per-run report of what the cleaner did with each cache file

use crate::cache::PackageFileIdentity;
use crate::policy::{DeleteReason, KeepReason};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::PathBuf;

/// What happened to one file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum FileOutcome {
    Deleted { reason: DeleteReason },
    /// Delete verdict during a dry run
    WouldDelete { reason: DeleteReason },
    Kept { reason: KeepReason },
    /// No verdict: unparseable name or a failed query
    Skipped { error: String },
    DeleteFailed { reason: DeleteReason, error: String },
}

impl FileOutcome {
    fn label(&self) -> &'static str {
        match self {
            FileOutcome::Deleted { .. } => "deleted",
            FileOutcome::WouldDelete { .. } => "would-delete",
            FileOutcome::Kept { .. } => "kept",
            FileOutcome::Skipped { .. } => "skipped",
            FileOutcome::DeleteFailed { .. } => "delete-failed",
        }
    }

    fn detail(&self) -> String {
        match self {
            FileOutcome::Deleted { reason } | FileOutcome::WouldDelete { reason } => {
                reason.to_string()
            }
            FileOutcome::Kept { reason } => reason.to_string(),
            FileOutcome::Skipped { error } => error.clone(),
            FileOutcome::DeleteFailed { reason, error } => format!("{}: {}", reason, error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileReport {
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<PackageFileIdentity>,
    pub size_bytes: u64,
    pub changed_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

/// Summary of one cleaner run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanReport {
    pub archives_dir: PathBuf,
    pub dry_run: bool,
    pub evaluated_at: DateTime<Utc>,
    pub files: Vec<FileReport>,
}

impl CleanReport {
    pub fn new(archives_dir: PathBuf, dry_run: bool, evaluated_at: DateTime<Utc>) -> Self {
        Self {
            archives_dir,
            dry_run,
            evaluated_at,
            files: Vec::new(),
        }
    }

    fn count(&self, pred: impl Fn(&FileOutcome) -> bool) -> usize {
        self.files.iter().filter(|f| pred(&f.outcome)).count()
    }

    pub fn deleted(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Deleted { .. } | FileOutcome::WouldDelete { .. }))
    }

    pub fn kept(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Kept { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::DeleteFailed { .. }))
    }

    /// Bytes released by deletions (or that would be, in a dry run)
    pub fn freed_bytes(&self) -> u64 {
        self.files
            .iter()
            .filter(|f| {
                matches!(
                    f.outcome,
                    FileOutcome::Deleted { .. } | FileOutcome::WouldDelete { .. }
                )
            })
            .map(|f| f.size_bytes)
            .sum()
    }

    /// Plain-text table for terminals
    pub fn render_text(&self) -> String {
        let mut out = String::new();

        if self.files.is_empty() {
            let _ = writeln!(out, "No package archives found.");
        } else {
            let _ = writeln!(out, "{:<48}{:<14}{:<9}{}", "FILE", "OUTCOME", "SIZE", "DETAIL");
            let _ = writeln!(out, "{}", "-".repeat(96));
            for file in &self.files {
                let _ = writeln!(
                    out,
                    "{:<48}{:<14}{:<9}{}",
                    file.file_name,
                    file.outcome.label(),
                    format_size(file.size_bytes),
                    file.outcome.detail()
                );
            }
        }

        let _ = writeln!(
            out,
            "\n{}: {}, kept: {}, skipped: {}, failed: {}, freed: {}",
            if self.dry_run { "Would delete" } else { "Deleted" },
            self.deleted(),
            self.kept(),
            self.skipped(),
            self.failed(),
            format_size(self.freed_bytes())
        );
        let _ = writeln!(out, "Archives: {}", self.archives_dir.display());
        out
    }
}

pub(crate) fn format_size(bytes: u64) -> String {
    let size_kb = bytes as f64 / 1024.0;
    if size_kb > 1024.0 {
        format!("{:.1}M", size_kb / 1024.0)
    } else {
        format!("{:.0}K", size_kb)
    }
}
