//! Batch module: dispatching jobs and collecting run statistics.
//!
//! A [`BatchRunner`] walks a [`BatchPlan`](crate::scan::BatchPlan) once, in
//! order. For each job it checks for cancellation, skips ignored entries,
//! short-circuits on an existing target, and otherwise copies (passthrough)
//! or transcodes (convertible). Every processed job updates [`RunStats`],
//! and the summary is emitted whether the run completes or is interrupted.

mod runner;
mod stats;
mod types;

pub use runner::BatchRunner;
pub use stats::{JobOutcome, RunStats};
pub use types::{BatchReport, RunOutcome};
