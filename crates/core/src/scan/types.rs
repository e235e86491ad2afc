//! Types for the scan module.

use serde::Serialize;
use std::path::{Path, PathBuf};

/// Extension every target file carries.
pub const TARGET_EXTENSION: &str = "wav";

/// Extensions recognized as audio, in classification order.
pub const AUDIO_EXTENSIONS: &[&str] = &["wav", "flac", "aiff"];

/// How a directory entry is handled by the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    /// Already in the target format; copied verbatim.
    Passthrough,
    /// Needs transcoding to reach the target format.
    Convertible,
    /// Not audio, not counted and not processed.
    Ignored,
}

impl JobKind {
    /// Whether the entry takes part in the batch.
    pub fn is_audio(&self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

/// One unit of work: a source file and where its `.wav` ends up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionJob {
    pub source_path: PathBuf,
    pub target_path: PathBuf,
    pub kind: JobKind,
}

impl ConversionJob {
    /// File name of the source, used in logs and the error list.
    pub fn file_name(&self) -> String {
        display_name(&self.source_path)
    }

    /// File name of the target.
    pub fn target_name(&self) -> String {
        display_name(&self.target_path)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// The resolved input and output folders plus the jobs found in the input.
#[derive(Debug, Clone)]
pub struct BatchPlan {
    pub input_folder: PathBuf,
    pub output_folder: PathBuf,
    /// Every regular file in the input folder, sorted by file name.
    pub jobs: Vec<ConversionJob>,
}

impl BatchPlan {
    /// Number of entries with a recognized audio extension.
    pub fn audio_file_count(&self) -> usize {
        self.jobs.iter().filter(|j| j.kind.is_audio()).count()
    }

    /// Whether at least one job needs the transcoder.
    pub fn has_convertible(&self) -> bool {
        self.jobs.iter().any(|j| j.kind == JobKind::Convertible)
    }
}

/// Result of preparing a folder for conversion.
#[derive(Debug, Clone)]
pub enum Preparation {
    /// The output folder exists and the plan can be executed.
    Ready(BatchPlan),
    /// The folder holds no recognized audio files; nothing was created.
    NothingToDo { input_folder: PathBuf },
}
