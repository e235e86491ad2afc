//! Types for the placer module.

use serde::Serialize;
use std::path::PathBuf;

/// A single file to copy to its destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilePlacement {
    /// Identifier used in logs (the source file name).
    pub item_id: String,
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// Information about a placed file.
#[derive(Debug, Clone, Serialize)]
pub struct PlacedFile {
    pub item_id: String,
    pub destination: PathBuf,
    pub size_bytes: u64,
    /// SHA-256 of the copied bytes, when verification is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}
