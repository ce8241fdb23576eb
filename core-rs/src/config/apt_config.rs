//! Archives directory resolution through apt-config
//!
//! ```text
//! $ apt-config --format '%f=%v%n' dump Dir
//! Dir=/
//! Dir::Cache=var/cache/apt
//! Dir::Cache::archives=archives/
//! Dir::Cache::srcpkgcache=srcpkgcache.bin
//! Dir::Cache::pkgcache=pkgcache.bin
//! ```
//!
//! The archives directory is `Dir` / `Dir::Cache` / `Dir::Cache::archives`,
//! joined lexically: a leading `/` on an inner component does not reset the
//! path, so `Dir=/srv/root` with `Dir::Cache=/var/cache/apt` stays under
//! `/srv/root`.

use crate::drivers::dpkg::run_tool;
use crate::errors::{CleanError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Keys that make up the archives path, outermost first
pub const DIR_KEYS: [&str; 3] = ["Dir", "Dir::Cache", "Dir::Cache::archives"];

/// Build the archives directory from `apt-config dump` output
pub fn parse_dir_dump(output: &str) -> Result<PathBuf> {
    let values: HashMap<&str, &str> = output
        .lines()
        .filter_map(|line| line.split_once('='))
        .filter(|(key, _)| DIR_KEYS.contains(key))
        .collect();

    let mut dir = PathBuf::new();
    for (i, key) in DIR_KEYS.iter().enumerate() {
        match values.get(key) {
            Some(value) if !value.is_empty() => {
                if i == 0 {
                    dir.push(value);
                } else {
                    dir.push(value.trim_start_matches('/'));
                }
            }
            _ => {
                return Err(CleanError::Config(format!("apt-config {} is empty", key)));
            }
        }
    }
    Ok(dir)
}

/// Ask apt-config where downloaded archives are kept
pub fn resolve_archives_dir(apt_config: &Path) -> Result<PathBuf> {
    let args = ["--format", "%f=%v%n", "dump", "Dir"];
    let output = run_tool(apt_config, &args)
        .map_err(|e| CleanError::Config(format!("Cannot run apt-config: {}", e)))?;

    if !output.status.success() {
        return Err(CleanError::Config(format!(
            "apt-config dump failed ({}): {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    let dir = parse_dir_dump(&String::from_utf8_lossy(&output.stdout))?;
    debug!(archives_dir = %dir.display(), "resolved through apt-config");
    Ok(dir)
}
