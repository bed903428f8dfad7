// src/error.rs
// =============================================================================
// Typed errors for the audit.
//
// Two families of failure exist:
// - ConfigurationError: the run cannot start (bad root, bad worker count).
//   These abort the program before anything is indexed.
// - DocumentAnalysisError: one document could not be analyzed. The audit
//   logs it, drops that document's record and keeps going.
//
// The application layer (main.rs, report writing) uses anyhow on top of
// these, the same way it wraps any other error.
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("root directory does not exist: {}", .0.display())]
    MissingRoot(PathBuf),

    #[error("root is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("worker count must be at least 1")]
    NoWorkers,
}

#[derive(Error, Debug)]
pub enum DocumentAnalysisError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("analysis task for {path} did not complete: {message}")]
    Task { path: String, message: String },
}
