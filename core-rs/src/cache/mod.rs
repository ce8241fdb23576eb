//! Package archive cache module
//!
//! Works on the apt archives directory (normally /var/cache/apt/archives/).
//! Archives are named: <name>_<version>_<architecture>.deb

pub mod cleaner;
pub mod filename;
pub mod report;

pub use cleaner::{status_change_time, ArchiveCleaner, CacheEntry};
pub use filename::{PackageFileIdentity, ARCHIVE_EXTENSION};
pub use report::{CleanReport, FileOutcome, FileReport};
