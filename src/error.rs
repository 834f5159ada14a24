//! Error types for the treesync replication engine.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a whole sync run
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open sync log {path}: {source}")]
    Journal {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Sync task failed: {0}")]
    Task(String),
}

impl SyncError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SyncError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Kind of operation that touched an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Snapshotting an entry of either tree
    Read,
    Delete,
    Modify,
    Create,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Read => write!(f, "read"),
            Operation::Delete => write!(f, "delete"),
            Operation::Modify => write!(f, "modify"),
            Operation::Create => write!(f, "create"),
        }
    }
}

/// A single failed operation. The rest of the run keeps going.
#[derive(Debug, Error)]
#[error("Failed to {operation} '{}': {source}", relative_path.display())]
pub struct SyncOperationError {
    pub operation: Operation,
    pub relative_path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Invalid invocation or configuration. Reported before any sync is attempted.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    #[error("{what} does not exist: {}", path.display())]
    NotFound { what: &'static str, path: PathBuf },

    #[error("{what} is not a directory: {}", path.display())]
    NotADirectory { what: &'static str, path: PathBuf },

    #[error("{inner} must not be inside {outer}")]
    NestedPaths {
        inner: &'static str,
        outer: &'static str,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}
