//! Error types for the scan module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a run before any job is processed.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The input folder does not exist.
    #[error("The folder {path} does not exist")]
    NotFound { path: PathBuf },

    /// The input path exists but is not a directory.
    #[error("The path {path} is not a valid directory")]
    NotADirectory { path: PathBuf },

    /// The input path has no final component to name the output folder after.
    #[error("Cannot derive an output folder name from {path}")]
    NoFolderName { path: PathBuf },

    /// The output folder could not be created.
    #[error("Failed to create output folder: {path}")]
    OutputFolder {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O error while reading the input folder.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
