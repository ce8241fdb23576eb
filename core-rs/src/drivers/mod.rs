//! Drivers module for package state queries
//!
//! Provides the query interfaces the eviction policy depends on
//! (VersionOracle and VersionComparator traits) and implementations:
//! - DpkgDriver: dpkg-query / apt-cache / dpkg subprocesses
//! - StaticOracle: in-memory package table
//! - DebianOrdering: native Debian version comparison

pub mod dpkg;
mod memory;
mod traits;
pub mod version;

pub use dpkg::DpkgDriver;
pub use memory::{PackageState, StaticOracle};
pub use traits::{Relation, VersionComparator, VersionOracle};
pub use version::{DebianOrdering, DebianVersion};
