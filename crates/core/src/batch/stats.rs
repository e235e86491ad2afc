//! Run statistics and the end-of-run summary.

use serde::Serialize;
use tracing::{error, info};

/// Outcome of a single processed job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// The target already existed.
    Skipped,
    /// Passthrough file copied to the target.
    Copied,
    /// Convertible file transcoded to the target.
    Converted,
    /// Copy or transcode failed for the named file.
    Errored { file_name: String },
}

/// Counters for one run.
///
/// `checked` is only ever incremented together with exactly one outcome
/// counter, so `checked == copied + converted + skipped + errored` holds
/// between any two calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Entries in the folder with a recognized audio extension.
    pub total_files: usize,
    pub checked: usize,
    pub copied: usize,
    pub converted: usize,
    pub skipped: usize,
    pub errored: usize,
    /// File names of errored jobs, in processing order.
    pub errored_files: Vec<String>,
}

impl RunStats {
    /// Creates empty stats for a folder with `total_files` audio files.
    pub fn new(total_files: usize) -> Self {
        Self {
            total_files,
            ..Default::default()
        }
    }

    /// Records the outcome of one job.
    pub fn record(&mut self, outcome: JobOutcome) {
        self.checked += 1;
        match outcome {
            JobOutcome::Skipped => self.skipped += 1,
            JobOutcome::Copied => self.copied += 1,
            JobOutcome::Converted => self.converted += 1,
            JobOutcome::Errored { file_name } => {
                self.errored += 1;
                self.errored_files.push(file_name);
            }
        }
    }

    /// Whether the counters add up.
    pub fn is_consistent(&self) -> bool {
        self.checked == self.copied + self.converted + self.skipped + self.errored
            && self.errored == self.errored_files.len()
    }

    /// The summary lines, in report order.
    ///
    /// The errored file list is only present when something failed.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Folder contained {} audio files.", self.total_files),
            format!("Checked {} files.", self.checked),
            format!("Copied {} files.", self.copied),
            format!("Converted {} files.", self.converted),
            format!("Skipped {} files (already converted).", self.skipped),
            format!("Encountered {} errors during conversion.", self.errored),
        ];
        if let Some(list) = self.errored_list() {
            lines.push(format!("Files with errors: {list}"));
        }
        lines
    }

    /// Comma-joined errored file names, if any.
    pub fn errored_list(&self) -> Option<String> {
        if self.errored == 0 {
            None
        } else {
            Some(self.errored_files.join(", "))
        }
    }

    /// Emits the summary through `tracing`.
    pub fn log_summary(&self) {
        let lines = self.summary_lines();
        let (counts, errors) = lines.split_at(lines.len().min(6));
        for line in counts {
            info!("{line}");
        }
        for line in errors {
            error!("{line}");
        }
    }
}
