//! # aptclean core - apt archive cache eviction
//!
//! Decides which downloaded package files in the apt archive cache
//! (`/var/cache/apt/archives/*.deb`) are safe to delete.
//!
//! ## Core Principle
//!
//! **Never guess**: a file is only deleted when an authoritative source says
//! it is obsolete, or when nothing tracks it any more and it has sat in the
//! cache longer than the grace period. A name that does not parse or a
//! query that fails leaves the file where it is.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌───────────────────┐   ┌──────────────────────┐
//! │ ArchiveCleaner│──▶│ PackageFileIdentity│──▶│   EvictionPolicy     │
//! │ scan / delete │   │ name_version_arch  │   │ installed? newer?    │
//! └──────────────┘   └───────────────────┘   │ candidate? ctime age │
//!                                             └──────────┬───────────┘
//!                                                        │
//!                              ┌─────────────────────────┴──────┐
//!                              ▼                                ▼
//!                       VersionOracle                  VersionComparator
//!                 (DpkgDriver / StaticOracle)    (DpkgDriver / DebianOrdering)
//! ```

pub mod cache;
pub mod config;
pub mod drivers;
pub mod errors;
pub mod logging;
pub mod policy;

pub use cache::{
    ArchiveCleaner, CacheEntry, CleanReport, FileOutcome, FileReport, PackageFileIdentity,
};
pub use config::{CleanConfig, ToolOverrides, ToolPaths};
pub use drivers::{
    DebianOrdering, DebianVersion, DpkgDriver, Relation, StaticOracle, VersionComparator,
    VersionOracle,
};
pub use errors::CleanError;
pub use policy::{DeleteReason, EvictionPolicy, EvictionVerdict, KeepReason, MAX_ELAPSED};

/// Crate version, reported by the CLI
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default apt archives directory on Debian-based systems
pub const DEFAULT_ARCHIVES_DIR: &str = "/var/cache/apt/archives";
