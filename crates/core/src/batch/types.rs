//! Types for the batch module.

use serde::Serialize;

use super::stats::RunStats;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// Every job of the plan was processed.
    Completed,
    /// The run was cancelled before the plan was exhausted.
    Interrupted,
}

/// Final state of a run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub stats: RunStats,
    pub outcome: RunOutcome,
}

impl BatchReport {
    /// Whether the run was cut short by cancellation.
    pub fn is_interrupted(&self) -> bool {
        self.outcome == RunOutcome::Interrupted
    }
}
