// src/errors.rs

//! Crate-wide error type.
//!
//! The first four variants are the orchestration error kinds callers are
//! expected to branch on; the rest cover loading and backend plumbing.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Flag operation that failed during pre- or post-processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagOp {
    Touch,
    Remove,
    RemoveRecursive,
}

impl fmt::Display for FlagOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FlagOp::Touch => "touch",
            FlagOp::Remove => "remove",
            FlagOp::RemoveRecursive => "remove-recursive",
        };
        f.write_str(s)
    }
}

#[derive(Error, Debug)]
pub enum FlagpipeError {
    /// A node's job configuration lacks a required property.
    #[error("node '{node}': missing required property '{key}'")]
    ConfigValidation { node: String, key: String },

    /// A marker operation failed; the coordination substrate is unreliable.
    #[error("node '{node}': {op} failed on {}", path.display())]
    FlagOperation {
        node: String,
        op: FlagOp,
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// A `.busy` marker was found while claiming a node.
    #[error("node '{node}': busy flag found at {}", path.display())]
    BusyConflict { node: String, path: PathBuf },

    /// A job finished with a non-zero return code. Recoverable.
    #[error("node '{node}': job failed with return code {code}")]
    JobExecution { node: String, code: i32 },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Cycle detected in DAG: {0}")]
    DagCycle(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FlagpipeError {
    /// Whether this error aborts a launcher run.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, FlagpipeError::JobExecution { .. })
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, FlagpipeError>;
