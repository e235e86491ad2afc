//! Types for the converter module.

use serde::Serialize;
use std::path::PathBuf;

/// A single transcode request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscodeJob {
    /// Identifier used in logs (the source file name).
    pub job_id: String,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
}

/// Result of a successful transcode.
#[derive(Debug, Clone, Serialize)]
pub struct TranscodeResult {
    pub job_id: String,
    pub output_path: PathBuf,
    pub output_size_bytes: u64,
    pub duration_ms: u64,
}
