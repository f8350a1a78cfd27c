//! Error types for projloclib

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can abort a run before any report is produced.
///
/// Per-file read problems are not errors: they surface as
/// [`ReadOutcome`](crate::reader::ReadOutcome) values instead.
#[derive(Error, Debug)]
pub enum ProjlocError {
    /// Path does not exist
    #[error("Path does not exist: {0}")]
    PathNotFound(PathBuf),

    /// Scan root is a file, not a directory
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// No configuration document could be located
    #[error("no configuration file found (tried {0})")]
    ConfigNotFound(String),

    /// Failed to read the configuration document
    #[error("failed to read config '{path}': {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Configuration document is not valid JSON or misses required keys
    #[error("failed to parse config '{path}': {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// Configuration parsed but holds an unusable value
    #[error("invalid config '{path}': {message}")]
    ConfigInvalid { path: PathBuf, message: String },
}
