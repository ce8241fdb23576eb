//! dpkg / apt subprocess driver
//!
//! Answers version queries by running the package manager's own tools,
//! always under `LC_ALL=C` so their output can be parsed:
//!
//! - installed: `dpkg-query -f '${Version}' -W <name>:<arch>`
//! - candidate: `apt-cache policy -- <name>:<arch>` (the `Candidate:` line)
//! - ordering:  `dpkg --compare-versions <a> <op> <b>` (exit 0 = holds)

use crate::config::ToolPaths;
use crate::drivers::traits::{Relation, VersionComparator, VersionOracle};
use crate::errors::{CleanError, Result};
use std::path::Path;
use std::process::{Command, Output};
use tracing::{debug, warn};

const CANDIDATE_PREFIX: &str = "Candidate:";
const NO_CANDIDATE: &str = "(none)";

/// Run a package tool with a fixed locale and capture its output
///
/// Only a failure to spawn is an error; the exit status is left to the caller.
pub(crate) fn run_tool(tool: &Path, args: &[&str]) -> Result<Output> {
    debug!(tool = %tool.display(), args = ?args, "exec");
    Command::new(tool)
        .args(args)
        .env("LC_ALL", "C")
        .output()
        .map_err(|e| CleanError::Query {
            command: tool.display().to_string(),
            message: format!("Failed to run: {}", e),
        })
}

fn describe_failure(tool: &Path, args: &[&str], output: &Output) -> CleanError {
    let stderr = String::from_utf8_lossy(&output.stderr);
    CleanError::Query {
        command: format!("{} {}", tool.display(), args.join(" ")),
        message: format!("{}: {}", output.status, stderr.trim()),
    }
}

/// Extract the candidate version from `apt-cache policy` output
pub fn parse_policy_candidate(output: &str, package: &str) -> Result<String> {
    let candidate = output
        .lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix(CANDIDATE_PREFIX))
        .map(str::trim)
        .ok_or_else(|| CleanError::CandidateNotFound(package.to_string()))?;

    if candidate.is_empty() || candidate == NO_CANDIDATE {
        return Err(CleanError::CandidateNotFound(package.to_string()));
    }
    Ok(candidate.to_string())
}

/// Driver that shells out to dpkg-query, apt-cache and dpkg
#[derive(Debug, Clone)]
pub struct DpkgDriver {
    tools: ToolPaths,
}

impl DpkgDriver {
    pub fn new(tools: ToolPaths) -> Self {
        Self { tools }
    }

    pub fn tools(&self) -> &ToolPaths {
        &self.tools
    }
}

impl VersionOracle for DpkgDriver {
    fn installed_version(&self, name: &str, architecture: &str) -> Result<Option<String>> {
        let spec = format!("{}:{}", name, architecture);
        let args = ["-f", "${Version}", "-W", spec.as_str()];
        let output = run_tool(&self.tools.dpkg_query, &args)?;

        if !output.status.success() {
            debug!(
                package = %spec,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "dpkg-query found no record"
            );
            return Ok(None);
        }

        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if version.is_empty() {
            return Ok(None);
        }
        Ok(Some(version))
    }

    fn candidate_version(&self, name: &str, architecture: &str) -> Result<String> {
        let spec = format!("{}:{}", name, architecture);
        let args = ["policy", "--", spec.as_str()];
        let output = run_tool(&self.tools.apt_cache, &args)?;

        if !output.status.success() {
            return Err(describe_failure(&self.tools.apt_cache, &args, &output));
        }

        parse_policy_candidate(&String::from_utf8_lossy(&output.stdout), &spec)
    }
}

impl VersionComparator for DpkgDriver {
    fn compare(&self, a: &str, relation: Relation, b: &str) -> bool {
        let args = ["--compare-versions", a, relation.as_str(), b];
        match run_tool(&self.tools.dpkg, &args) {
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                if !stderr.trim().is_empty() {
                    // dpkg reports unparsable versions on stderr and exits non-zero
                    warn!(a, %relation, b, stderr = %stderr.trim(), "dpkg --compare-versions");
                }
                output.status.success()
            }
            Err(e) => {
                warn!(a, %relation, b, error = %e, "cannot compare versions");
                false
            }
        }
    }
}
