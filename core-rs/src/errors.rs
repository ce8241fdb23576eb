//! Error types for the archive cleaner

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CleanError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Required tool not found: {tool}")]
    ToolNotFound {
        tool: String,
        #[source]
        source: which::Error,
    },

    #[error("Cannot parse cache file name: {0}")]
    ParseFailure(String),

    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    #[error("Query failed ({command}): {message}")]
    Query { command: String, message: String },

    #[error("No candidate version for {0}")]
    CandidateNotFound(String),

    #[error("Cannot list archives directory {path}: {source}")]
    ListDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CleanError {
    /// Errors that abort the whole run instead of skipping one file.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            CleanError::Config(_) | CleanError::ToolNotFound { .. } | CleanError::ListDir { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, CleanError>;
