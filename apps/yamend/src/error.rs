//! Error types for setup and per-file failures.
//!
//! Setup errors (bad root, bad exclude glob) abort a run before any file is
//! touched. Per-file errors never escape the runner: they are logged and the
//! file is reported as unchanged.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FixError {
    /// Root path given on the command line does not exist.
    #[error("Path does not exist: {0}")]
    RootNotFound(PathBuf),

    /// Root path exists but is a file; only directories are scanned.
    #[error("Path is not a directory: {0}")]
    RootNotDirectory(PathBuf),

    /// An exclude pattern could not be compiled as a glob.
    #[error("Invalid exclude pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// Directory traversal failed.
    #[error("Failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// Reading or writing a target file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backup copy could not be created; the original is left untouched.
    #[error("Failed to create backup for {path}: {source}")]
    Backup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
